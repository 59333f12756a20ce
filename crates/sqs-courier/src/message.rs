//! Message types for queue operations.

use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Attributes attached to an outbound message, keyed by attribute name
pub type MessageAttributes = HashMap<String, MessageAttributeValue>;

/// Queue attributes as reported by the service, uninterpreted
pub type QueueAttributes = HashMap<String, String>;

// ============================================================================
// Message Attributes
// ============================================================================

/// Typed value of a single message attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttributeValue {
    data_type: String,
    string_value: Option<String>,
    binary_value: Option<Vec<u8>>,
}

impl MessageAttributeValue {
    /// `String` attribute
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: Some(value.into()),
            binary_value: None,
        }
    }

    /// `Number` attribute. SQS carries numbers as strings.
    pub fn number(value: impl fmt::Display) -> Self {
        Self {
            data_type: "Number".to_string(),
            string_value: Some(value.to_string()),
            binary_value: None,
        }
    }

    /// `Binary` attribute
    pub fn binary(value: impl Into<Vec<u8>>) -> Self {
        Self {
            data_type: "Binary".to_string(),
            string_value: None,
            binary_value: Some(value.into()),
        }
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn string_value(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    pub fn binary_value(&self) -> Option<&[u8]> {
        self.binary_value.as_deref()
    }
}

// ============================================================================
// Outbound Messages
// ============================================================================

/// Deduplication id attached to every send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeduplicationId(Uuid);

impl DeduplicationId {
    /// Generate a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DeduplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeduplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single SendMessage request
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    body: String,
    queue_url: String,
    delay_seconds: i32,
    attributes: MessageAttributes,
    deduplication_id: DeduplicationId,
    group_id: String,
}

impl OutboundMessage {
    /// Build a request for immediate delivery with a freshly generated deduplication id
    pub fn new(
        body: impl Into<String>,
        attributes: MessageAttributes,
        group_id: impl Into<String>,
        queue_url: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            queue_url: queue_url.into(),
            delay_seconds: 0,
            attributes,
            deduplication_id: DeduplicationId::new(),
            group_id: group_id.into(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    pub fn delay_seconds(&self) -> i32 {
        self.delay_seconds
    }

    pub fn attributes(&self) -> &MessageAttributes {
        &self.attributes
    }

    pub fn deduplication_id(&self) -> DeduplicationId {
        self.deduplication_id
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }
}

/// What the service reports back for an accepted message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: Option<String>,
    pub sequence_number: Option<String>,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
