//! Queue client and the remote API seam it is built on.

use crate::config::ClientConfig;
use crate::error::{DomainError, QueueError, RemoteError};
use crate::message::{MessageAttributes, OutboundMessage, QueueAttributes, SentMessage};
use crate::providers::AwsSqsApi;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Attribute name selecting every queue attribute
pub const ALL_ATTRIBUTES: &str = "All";

/// The four SQS operations the client consumes.
///
/// Implementations issue exactly one request per call and report failures as
/// [`RemoteError`] values. Transport, signing and retries are the
/// implementation's business.
#[async_trait]
pub trait SqsApi: Send + Sync {
    /// SendMessage
    async fn send_message(&self, message: &OutboundMessage) -> Result<SentMessage, RemoteError>;

    /// GetQueueAttributes for the named attributes
    async fn get_queue_attributes(
        &self,
        queue_url: &str,
        attribute_names: &[&str],
    ) -> Result<QueueAttributes, RemoteError>;

    /// GetQueueUrl
    async fn get_queue_url(&self, queue_name: &str) -> Result<String, RemoteError>;

    /// CreateQueue, returning the new queue's URL
    async fn create_queue(
        &self,
        queue_name: &str,
        attributes: &QueueAttributes,
    ) -> Result<String, RemoteError>;

    /// Region every request from this handle is scoped to
    fn region(&self) -> &str;
}

/// Client for one region of the queue service.
///
/// Cloning is cheap; clones share the underlying API handle.
#[derive(Clone)]
pub struct QueueClient {
    region: String,
    api: Arc<dyn SqsApi>,
}

impl QueueClient {
    /// Wrap an API handle. The client takes its region from the handle.
    pub fn new(api: Arc<dyn SqsApi>) -> Self {
        Self {
            region: api.region().to_string(),
            api,
        }
    }

    /// Build a client backed by the AWS SDK for the configured region
    pub async fn connect(config: &ClientConfig) -> Self {
        let api = AwsSqsApi::from_config(config).await;
        Self::new(Arc::new(api))
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Send `body` to a FIFO queue under `group_id`.
    ///
    /// Every call carries a new deduplication id, so repeated calls with the
    /// same arguments are delivered as distinct messages.
    pub async fn send_message(
        &self,
        body: &str,
        attributes: MessageAttributes,
        group_id: &str,
        queue_url: &str,
    ) -> Result<(), QueueError> {
        let message = OutboundMessage::new(body, attributes, group_id, queue_url);

        match self.api.send_message(&message).await {
            Ok(sent) => {
                debug!(
                    queue_url = %queue_url,
                    deduplication_id = %message.deduplication_id(),
                    message_id = ?sent.message_id,
                    "Message sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(queue_url = %queue_url, error = %e, "Failed to send message");
                Err(e.into())
            }
        }
    }

    /// Fetch all attributes of a queue exactly as the service reports them
    pub async fn get_queue_attributes(&self, queue_url: &str) -> Result<QueueAttributes, QueueError> {
        self.api
            .get_queue_attributes(queue_url, &[ALL_ATTRIBUTES])
            .await
            .map_err(|e| {
                error!(queue_url = %queue_url, error = %e, "Failed to get queue attributes");
                e.into()
            })
    }

    /// Create `queue_name` with `attributes` when no queue of that name exists.
    ///
    /// Returns the new queue's URL. An existing queue is reported as
    /// [`DomainErrorCode::QueueExists`](crate::DomainErrorCode::QueueExists)
    /// rather than returning its URL.
    pub async fn create_if_not_exists(
        &self,
        queue_name: &str,
        attributes: QueueAttributes,
    ) -> Result<String, QueueError> {
        match self.api.get_queue_url(queue_name).await {
            Ok(_) => Err(DomainError::queue_exists(queue_name).into()),
            Err(e) if e.is_queue_does_not_exist() => {
                debug!(queue_name = %queue_name, "Queue not found, creating");

                let queue_url = self
                    .api
                    .create_queue(queue_name, &attributes)
                    .await
                    .map_err(|e| {
                        error!(queue_name = %queue_name, error = %e, "Failed to create queue");
                        QueueError::from(e)
                    })?;

                info!(queue_name = %queue_name, queue_url = %queue_url, "Queue created");
                Ok(queue_url)
            }
            Err(e) => {
                error!(queue_name = %queue_name, error = %e, "Failed to look up queue");
                Err(e.into())
            }
        }
    }
}

impl fmt::Debug for QueueClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueClient")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
