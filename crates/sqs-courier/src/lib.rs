//! # SQS Courier
//!
//! Thin async client for AWS SQS that sends messages to FIFO queues, reads
//! queue attributes and provisions queues that do not exist yet.
//!
//! Every operation is a single request/response round trip. Transport,
//! signing, retries and credential discovery belong to the AWS SDK; this
//! crate only shapes requests and reports failures.
//!
//! ## Module Organization
//!
//! - [error] - Remote, domain and configuration errors
//! - [message] - Outbound messages, attribute values and deduplication ids
//! - [config] - Per-client configuration and its loader
//! - [client] - The [`QueueClient`] and the [`SqsApi`] seam it talks through
//! - [providers] - SDK-backed and in-memory [`SqsApi`] implementations
//!
//! ## Example
//!
//! ```no_run
//! use sqs_courier::{ClientConfig, MessageAttributes, QueueClient};
//!
//! # async fn example() -> Result<(), sqs_courier::QueueError> {
//! let config = ClientConfig::with_region("eu-west-1");
//! let client = QueueClient::connect(&config).await;
//!
//! client
//!     .send_message(
//!         "hello",
//!         MessageAttributes::new(),
//!         "group-1",
//!         "https://sqs.eu-west-1.amazonaws.com/123456789012/orders.fifo",
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod providers;

pub use client::{QueueClient, SqsApi, ALL_ATTRIBUTES};
pub use config::ClientConfig;
pub use error::{
    ConfigurationError, DomainError, DomainErrorCode, Operation, QueueError, RemoteError,
    RemoteErrorKind,
};
pub use message::{
    DeduplicationId, MessageAttributeValue, MessageAttributes, OutboundMessage, QueueAttributes,
    SentMessage,
};
pub use providers::{AwsSqsApi, InMemorySqsApi};
