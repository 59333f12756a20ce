//! Tests for the queue client against the in-memory provider.

use super::*;
use crate::error::{DomainErrorCode, Operation, RemoteErrorKind};
use crate::message::MessageAttributeValue;
use crate::providers::InMemorySqsApi;
use std::collections::HashSet;
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Test Helper Functions
// ============================================================================

fn create_test_client() -> (QueueClient, Arc<InMemorySqsApi>) {
    let api = Arc::new(InMemorySqsApi::new("eu-west-1"));
    let client = QueueClient::new(api.clone());
    (client, api)
}

fn queue_attributes(pairs: &[(&str, &str)]) -> QueueAttributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Construction Tests
// ============================================================================

mod construction_tests {
    use super::*;

    #[test]
    fn test_client_takes_region_from_api() {
        let (client, _) = create_test_client();
        assert_eq!(client.region(), "eu-west-1");
    }

    /// Verify building a second client does not change the first one's region
    #[test]
    fn test_last_configured_region_does_not_leak() {
        let first = QueueClient::new(Arc::new(InMemorySqsApi::new("us-east-1")));
        let second = QueueClient::new(Arc::new(InMemorySqsApi::new("eu-central-1")));

        assert_eq!(first.region(), "us-east-1");
        assert_eq!(second.region(), "eu-central-1");
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueueClient>();
    }
}

// ============================================================================
// SendMessage Tests
// ============================================================================

mod send_message_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_message_success_returns_unit() {
        let (client, api) = create_test_client();
        let url = api.insert_queue("orders.fifo", QueueAttributes::new()).await;

        let mut attributes = MessageAttributes::new();
        attributes.insert("tenant".to_string(), MessageAttributeValue::string("acme"));

        assert_ok!(
            client
                .send_message("payload", attributes.clone(), "group-1", &url)
                .await
        );

        let sent = api.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body(), "payload");
        assert_eq!(sent[0].group_id(), "group-1");
        assert_eq!(sent[0].queue_url(), url);
        assert_eq!(sent[0].attributes(), &attributes);
        assert_eq!(sent[0].delay_seconds(), 0);
    }

    /// Verify two identical sends carry different deduplication ids
    #[tokio::test]
    async fn test_each_send_gets_fresh_deduplication_id() {
        let (client, api) = create_test_client();
        let url = api.insert_queue("orders.fifo", QueueAttributes::new()).await;

        for _ in 0..2 {
            assert_ok!(
                client
                    .send_message("same body", MessageAttributes::new(), "same-group", &url)
                    .await
            );
        }

        let ids: HashSet<_> = api
            .sent_messages()
            .await
            .iter()
            .map(|m| m.deduplication_id())
            .collect();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_send_message_failure_is_passed_through() {
        let (client, api) = create_test_client();
        let url = api.insert_queue("orders.fifo", QueueAttributes::new()).await;
        let remote = RemoteError::from_code(
            Operation::SendMessage,
            "InvalidParameterValue",
            "MessageGroupId is required for FIFO queues",
        );
        api.fail_next(Operation::SendMessage, remote.clone()).await;

        let error = assert_err!(
            client
                .send_message("payload", MessageAttributes::new(), "", &url)
                .await
        );

        assert_eq!(error, QueueError::Remote(remote));
        assert!(api.sent_messages().await.is_empty());
    }
}

// ============================================================================
// GetQueueAttributes Tests
// ============================================================================

mod get_queue_attributes_tests {
    use super::*;

    #[tokio::test]
    async fn test_attributes_are_returned_unmodified() {
        let (client, api) = create_test_client();
        let url = api
            .insert_queue(
                "orders.fifo",
                queue_attributes(&[("FifoQueue", "true"), ("VisibilityTimeout", "45")]),
            )
            .await;

        let attributes = assert_ok!(client.get_queue_attributes(&url).await);

        let backend = assert_ok!(api.get_queue_attributes(&url, &[ALL_ATTRIBUTES]).await);
        assert_eq!(attributes, backend);
        assert_eq!(attributes.get("FifoQueue").map(String::as_str), Some("true"));
        assert_eq!(
            attributes.get("VisibilityTimeout").map(String::as_str),
            Some("45")
        );
    }

    #[tokio::test]
    async fn test_attribute_failure_is_passed_through() {
        let (client, api) = create_test_client();
        let url = api.queue_url_for("missing");

        let error = assert_err!(client.get_queue_attributes(&url).await);

        match error {
            QueueError::Remote(remote) => {
                assert_eq!(remote.kind(), RemoteErrorKind::QueueDoesNotExist);
                assert_eq!(remote.operation(), Operation::GetQueueAttributes);
            }
            other => panic!("Expected remote error, got {:?}", other),
        }
    }
}

// ============================================================================
// CreateIfNotExists Tests
// ============================================================================

mod create_if_not_exists_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_queue_is_created() {
        let (client, api) = create_test_client();
        let attributes = queue_attributes(&[("FifoQueue", "true")]);

        let url = assert_ok!(
            client
                .create_if_not_exists("orders.fifo", attributes.clone())
                .await
        );

        assert_eq!(url, api.queue_url_for("orders.fifo"));
        let stored = assert_ok!(client.get_queue_attributes(&url).await);
        assert_eq!(stored.get("FifoQueue").map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn test_existing_queue_is_reported_as_domain_error() {
        let (client, api) = create_test_client();
        api.insert_queue("orders", QueueAttributes::new()).await;

        let error = assert_err!(
            client
                .create_if_not_exists("orders", QueueAttributes::new())
                .await
        );

        assert!(error.is_queue_exists());
        assert_eq!(error.code(), Some(DomainErrorCode::QueueExists.as_str()));
        assert_eq!(error.to_string(), "Error QUEUE_EXISTS: Queue exists: orders");
    }

    #[tokio::test]
    async fn test_other_lookup_failure_is_passed_through() {
        let (client, api) = create_test_client();
        let remote = RemoteError::from_code(Operation::GetQueueUrl, "AccessDenied", "denied");
        api.fail_next(Operation::GetQueueUrl, remote.clone()).await;

        let error = assert_err!(
            client
                .create_if_not_exists("orders", QueueAttributes::new())
                .await
        );

        assert_eq!(error, QueueError::Remote(remote));
        assert!(api.queue_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_creation_failure_is_passed_through() {
        let (client, api) = create_test_client();
        let remote = RemoteError::from_code(
            Operation::CreateQueue,
            "InvalidAttributeName",
            "Unknown Attribute Colour.",
        );
        api.fail_next(Operation::CreateQueue, remote.clone()).await;

        let error = assert_err!(
            client
                .create_if_not_exists("orders", queue_attributes(&[("Colour", "blue")]))
                .await
        );

        assert_eq!(error, QueueError::Remote(remote));
    }

    /// Verify a lookup reporting the JSON-protocol code also leads to creation
    #[tokio::test]
    async fn test_json_protocol_not_found_code_leads_to_creation() {
        let (client, api) = create_test_client();
        api.fail_next(
            Operation::GetQueueUrl,
            RemoteError::from_code(Operation::GetQueueUrl, "QueueDoesNotExist", "missing"),
        )
        .await;

        let url = assert_ok!(
            client
                .create_if_not_exists("orders", QueueAttributes::new())
                .await
        );

        assert_eq!(url, api.queue_url_for("orders"));
    }
}
