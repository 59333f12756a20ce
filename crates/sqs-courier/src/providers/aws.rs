//! AWS SQS backend built on `aws-sdk-sqs`.
//!
//! The SDK owns transport, request signing, retries and credential
//! discovery. This module only maps between the crate's request types and the
//! SDK's builders, and flattens SDK failures into [`RemoteError`] values.
//!
//! ## Region scoping
//!
//! Each [`AwsSqsApi`] carries its own `aws_sdk_sqs::Config`. Building a second
//! handle for another region leaves the first one untouched; there is no
//! process-wide region setting.
//!
//! ## Example
//!
//! ```no_run
//! use sqs_courier::{AwsSqsApi, ClientConfig, QueueClient};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let mut config = ClientConfig::with_region("us-east-1");
//! config.endpoint_url = Some("http://localhost:4566".to_string());
//!
//! let api = AwsSqsApi::from_config(&config).await;
//! let client = QueueClient::new(Arc::new(api));
//! assert_eq!(client.region(), "us-east-1");
//! # }
//! ```

use crate::client::SqsApi;
use crate::config::ClientConfig;
use crate::error::{Operation, RemoteError, RemoteErrorKind};
use crate::message::{MessageAttributeValue, OutboundMessage, QueueAttributes, SentMessage};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::config::Region;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::primitives::Blob;
use aws_sdk_sqs::types::{MessageAttributeValue as SdkAttributeValue, QueueAttributeName};
use aws_sdk_sqs::Client as SdkClient;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

#[cfg(test)]
#[path = "aws_tests.rs"]
mod tests;

/// [`SqsApi`] implementation talking to AWS SQS (or a compatible endpoint)
#[derive(Clone)]
pub struct AwsSqsApi {
    client: SdkClient,
    region: String,
}

impl AwsSqsApi {
    /// Build a handle from the standard credential chain, scoped to `config.region`
    pub async fn from_config(config: &ClientConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some(profile) = &config.profile_name {
            loader = loader.profile_name(profile);
        }

        let shared_config = loader.load().await;
        let mut builder = aws_sdk_sqs::config::Builder::from(&shared_config);

        if let Some(endpoint) = &config.endpoint_url {
            debug!(endpoint = %endpoint, "Using SQS endpoint override");
            builder = builder.endpoint_url(endpoint);
        }

        Self::from_sdk_config(builder.build())
    }

    /// Build a handle from a fully prepared SDK configuration
    pub fn from_sdk_config(config: aws_sdk_sqs::Config) -> Self {
        let region = config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_default();

        Self {
            client: SdkClient::from_conf(config),
            region,
        }
    }

    /// The underlying SDK client
    pub fn sdk_client(&self) -> &SdkClient {
        &self.client
    }
}

impl fmt::Debug for AwsSqsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsSqsApi")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SqsApi for AwsSqsApi {
    async fn send_message(&self, message: &OutboundMessage) -> Result<SentMessage, RemoteError> {
        let attributes = message
            .attributes()
            .iter()
            .map(|(name, value)| Ok((name.clone(), to_sdk_attribute(value)?)))
            .collect::<Result<HashMap<_, _>, RemoteError>>()?;

        let output = self
            .client
            .send_message()
            .queue_url(message.queue_url())
            .message_body(message.body())
            .delay_seconds(message.delay_seconds())
            .set_message_attributes((!attributes.is_empty()).then_some(attributes))
            .message_deduplication_id(message.deduplication_id().to_string())
            .message_group_id(message.group_id())
            .send()
            .await
            .map_err(|e| remote_error(Operation::SendMessage, e))?;

        Ok(SentMessage {
            message_id: output.message_id().map(str::to_string),
            sequence_number: output.sequence_number().map(str::to_string),
        })
    }

    async fn get_queue_attributes(
        &self,
        queue_url: &str,
        attribute_names: &[&str],
    ) -> Result<QueueAttributes, RemoteError> {
        let names = attribute_names
            .iter()
            .map(|name| QueueAttributeName::from(*name))
            .collect::<Vec<_>>();

        let output = self
            .client
            .get_queue_attributes()
            .queue_url(queue_url)
            .set_attribute_names(Some(names))
            .send()
            .await
            .map_err(|e| remote_error(Operation::GetQueueAttributes, e))?;

        Ok(output
            .attributes()
            .map(|attributes| {
                attributes
                    .iter()
                    .map(|(name, value)| (name.as_str().to_string(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_queue_url(&self, queue_name: &str) -> Result<String, RemoteError> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|e| remote_error(Operation::GetQueueUrl, e))?;

        output
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| missing_queue_url(Operation::GetQueueUrl))
    }

    async fn create_queue(
        &self,
        queue_name: &str,
        attributes: &QueueAttributes,
    ) -> Result<String, RemoteError> {
        let attributes = attributes
            .iter()
            .map(|(name, value)| (QueueAttributeName::from(name.as_str()), value.clone()))
            .collect::<HashMap<_, _>>();

        let output = self
            .client
            .create_queue()
            .queue_name(queue_name)
            .set_attributes((!attributes.is_empty()).then_some(attributes))
            .send()
            .await
            .map_err(|e| remote_error(Operation::CreateQueue, e))?;

        output
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| missing_queue_url(Operation::CreateQueue))
    }

    fn region(&self) -> &str {
        &self.region
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn to_sdk_attribute(value: &MessageAttributeValue) -> Result<SdkAttributeValue, RemoteError> {
    SdkAttributeValue::builder()
        .data_type(value.data_type())
        .set_string_value(value.string_value().map(str::to_string))
        .set_binary_value(value.binary_value().map(Blob::new))
        .build()
        .map_err(|e| {
            RemoteError::new(
                Operation::SendMessage,
                RemoteErrorKind::InvalidRequest,
                e.to_string(),
            )
        })
}

fn missing_queue_url(operation: Operation) -> RemoteError {
    RemoteError::new(
        operation,
        RemoteErrorKind::Unknown,
        "response did not include a queue URL",
    )
}

/// Flatten an SDK failure into a [`RemoteError`]
fn remote_error<E, R>(operation: Operation, err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: fmt::Debug,
{
    let kind = match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            Some(RemoteErrorKind::Transport)
        }
        SdkError::ConstructionFailure(_) => Some(RemoteErrorKind::InvalidRequest),
        _ => None,
    };

    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    match (kind, err.code()) {
        (Some(kind), _) => RemoteError::new(operation, kind, message),
        (None, Some(code)) => RemoteError::from_code(operation, code, message),
        (None, None) => RemoteError::new(operation, RemoteErrorKind::Unknown, message),
    }
}
