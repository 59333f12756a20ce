//! In-memory SQS backend for testing and development.
//!
//! This module provides an in-process stand-in for the queue service that:
//! - Keeps a table of named queues with their creation attributes
//! - Records every message handed to `send_message`
//! - Answers unknown queues the way SQS does (`NonExistentQueue`)
//! - Lets tests inject a one-shot failure per operation
//!
//! Queue URLs take the SQS shape `<endpoint>/<account id>/<queue name>`.

use crate::client::{SqsApi, ALL_ATTRIBUTES};
use crate::error::{Operation, RemoteError};
use crate::message::{OutboundMessage, QueueAttributes, SentMessage};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

/// Account id used in generated queue URLs
pub const DEFAULT_ACCOUNT_ID: &str = "000000000000";

// ============================================================================
// Internal Storage Structures
// ============================================================================

struct StoredQueue {
    url: String,
    attributes: QueueAttributes,
    message_count: usize,
}

#[derive(Default)]
struct State {
    /// Queues keyed by name
    queues: HashMap<String, StoredQueue>,
    /// Every accepted message, in send order
    sent: Vec<OutboundMessage>,
    /// One-shot failures keyed by operation
    failures: HashMap<Operation, RemoteError>,
}

impl State {
    fn queue_by_url_mut(&mut self, queue_url: &str) -> Option<&mut StoredQueue> {
        self.queues.values_mut().find(|q| q.url == queue_url)
    }
}

// ============================================================================
// In-Memory Provider
// ============================================================================

/// [`SqsApi`] implementation holding all state in process
pub struct InMemorySqsApi {
    region: String,
    account_id: String,
    state: RwLock<State>,
}

impl InMemorySqsApi {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            state: RwLock::new(State::default()),
        }
    }

    /// URL a queue of this name gets (or would get) from this provider
    pub fn queue_url_for(&self, queue_name: &str) -> String {
        format!(
            "https://sqs.{}.amazonaws.com/{}/{}",
            self.region, self.account_id, queue_name
        )
    }

    /// Create a queue directly, bypassing failure injection. Returns its URL.
    pub async fn insert_queue(&self, queue_name: &str, attributes: QueueAttributes) -> String {
        let url = self.queue_url_for(queue_name);
        let mut state = self.state.write().await;
        state.queues.insert(
            queue_name.to_string(),
            StoredQueue {
                url: url.clone(),
                attributes,
                message_count: 0,
            },
        );
        url
    }

    /// Make the next call of `operation` fail with `error`
    pub async fn fail_next(&self, operation: Operation, error: RemoteError) {
        self.state.write().await.failures.insert(operation, error);
    }

    /// Messages accepted so far, in send order
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.state.read().await.sent.clone()
    }

    /// Names of all existing queues
    pub async fn queue_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().await.queues.keys().cloned().collect();
        names.sort();
        names
    }

    fn not_found(operation: Operation, target: &str) -> RemoteError {
        RemoteError::queue_does_not_exist(
            operation,
            format!("The specified queue does not exist: {}", target),
        )
    }
}

impl Default for InMemorySqsApi {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REGION)
    }
}

#[async_trait]
impl SqsApi for InMemorySqsApi {
    async fn send_message(&self, message: &OutboundMessage) -> Result<SentMessage, RemoteError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.failures.remove(&Operation::SendMessage) {
            return Err(error);
        }

        let queue = state
            .queue_by_url_mut(message.queue_url())
            .ok_or_else(|| Self::not_found(Operation::SendMessage, message.queue_url()))?;
        queue.message_count += 1;
        let sequence_number = queue.message_count.to_string();

        state.sent.push(message.clone());

        Ok(SentMessage {
            message_id: Some(Uuid::new_v4().to_string()),
            sequence_number: Some(sequence_number),
        })
    }

    async fn get_queue_attributes(
        &self,
        queue_url: &str,
        attribute_names: &[&str],
    ) -> Result<QueueAttributes, RemoteError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.failures.remove(&Operation::GetQueueAttributes) {
            return Err(error);
        }

        let queue = state
            .queue_by_url_mut(queue_url)
            .ok_or_else(|| Self::not_found(Operation::GetQueueAttributes, queue_url))?;

        let mut attributes = queue.attributes.clone();
        attributes.insert(
            "ApproximateNumberOfMessages".to_string(),
            queue.message_count.to_string(),
        );

        if !attribute_names.contains(&ALL_ATTRIBUTES) {
            attributes.retain(|name, _| attribute_names.contains(&name.as_str()));
        }

        Ok(attributes)
    }

    async fn get_queue_url(&self, queue_name: &str) -> Result<String, RemoteError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.failures.remove(&Operation::GetQueueUrl) {
            return Err(error);
        }

        state
            .queues
            .get(queue_name)
            .map(|queue| queue.url.clone())
            .ok_or_else(|| Self::not_found(Operation::GetQueueUrl, queue_name))
    }

    async fn create_queue(
        &self,
        queue_name: &str,
        attributes: &QueueAttributes,
    ) -> Result<String, RemoteError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.failures.remove(&Operation::CreateQueue) {
            return Err(error);
        }

        // CreateQueue is idempotent for identical attributes and returns the existing URL
        if let Some(existing) = state.queues.get(queue_name) {
            if &existing.attributes == attributes {
                return Ok(existing.url.clone());
            }
            return Err(RemoteError::from_code(
                Operation::CreateQueue,
                "QueueAlreadyExists",
                format!(
                    "A queue named {} already exists with different attributes",
                    queue_name
                ),
            ));
        }

        let url = self.queue_url_for(queue_name);
        state.queues.insert(
            queue_name.to_string(),
            StoredQueue {
                url: url.clone(),
                attributes: attributes.clone(),
                message_count: 0,
            },
        );

        Ok(url)
    }

    fn region(&self) -> &str {
        &self.region
    }
}
