//! Error types for queue operations.

use std::fmt;
use thiserror::Error;

/// Error type returned by every [`QueueClient`](crate::QueueClient) operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Failure reported by the queue service or its transport, passed through unchanged
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Locally raised policy failure
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl QueueError {
    /// Stable code of the underlying failure, if one is known
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote(e) => e.code(),
            Self::Domain(e) => Some(e.code().as_str()),
        }
    }

    /// Check whether this is the `QUEUE_EXISTS` domain error
    pub fn is_queue_exists(&self) -> bool {
        matches!(self, Self::Domain(e) if e.code() == DomainErrorCode::QueueExists)
    }
}

// ============================================================================
// Remote Errors
// ============================================================================

/// Remote operations consumed from the queue service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SendMessage,
    GetQueueAttributes,
    GetQueueUrl,
    CreateQueue,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendMessage => "SendMessage",
            Self::GetQueueAttributes => "GetQueueAttributes",
            Self::GetQueueUrl => "GetQueueUrl",
            Self::CreateQueue => "CreateQueue",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a remote failure.
///
/// The classification is informational only. Nothing in this crate retries
/// or rewrites an error based on its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    /// The named or addressed queue does not exist
    QueueDoesNotExist,
    /// Request rate or quota exceeded
    Throttled,
    /// Credentials rejected or caller not authorised
    PermissionDenied,
    /// The service rejected the request parameters
    InvalidRequest,
    /// The request never produced a service response (timeout, DNS, TLS, ...)
    Transport,
    Unknown,
}

impl RemoteErrorKind {
    /// Classify a service error code
    pub fn from_code(code: &str) -> Self {
        match code {
            "AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist" => {
                Self::QueueDoesNotExist
            }
            "RequestThrottled" | "ThrottlingException" | "Throttling" | "OverLimit"
            | "KmsThrottled" => Self::Throttled,
            "AccessDenied" | "AccessDeniedException" | "InvalidClientTokenId"
            | "UnrecognizedClientException" | "SignatureDoesNotMatch" | "InvalidSecurity"
            | "MissingAuthenticationToken" | "ExpiredToken" => Self::PermissionDenied,
            "InvalidParameterValue" | "InvalidAttributeName" | "InvalidAttributeValue"
            | "MissingParameter" | "InvalidMessageContents" | "UnsupportedOperation"
            | "InvalidAddress" | "ValidationError" | "ValidationException"
            | "InvalidParameterCombination" => Self::InvalidRequest,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QueueDoesNotExist => "queue does not exist",
            Self::Throttled => "throttled",
            Self::PermissionDenied => "permission denied",
            Self::InvalidRequest => "invalid request",
            Self::Transport => "transport",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by the queue service for a single operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({}): {message}", code_label(.code, .kind))]
pub struct RemoteError {
    operation: Operation,
    kind: RemoteErrorKind,
    code: Option<String>,
    message: String,
}

impl RemoteError {
    /// Create an error without a service error code
    pub fn new(operation: Operation, kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Create an error from a service error code, classifying it
    pub fn from_code(
        operation: Operation,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let code = code.into();
        Self {
            operation,
            kind: RemoteErrorKind::from_code(&code),
            code: Some(code),
            message: message.into(),
        }
    }

    /// Shorthand for the error the service returns for an unknown queue
    pub fn queue_does_not_exist(operation: Operation, message: impl Into<String>) -> Self {
        Self::from_code(
            operation,
            "AWS.SimpleQueueService.NonExistentQueue",
            message,
        )
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn kind(&self) -> RemoteErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_queue_does_not_exist(&self) -> bool {
        self.kind == RemoteErrorKind::QueueDoesNotExist
    }

    /// Check if the failure is likely to clear up on its own
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            RemoteErrorKind::Throttled | RemoteErrorKind::Transport
        )
    }
}

fn code_label<'a>(code: &'a Option<String>, kind: &RemoteErrorKind) -> &'a str {
    code.as_deref().unwrap_or(kind.as_str())
}

// ============================================================================
// Domain Errors
// ============================================================================

/// Stable codes for locally raised errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainErrorCode {
    /// `create_if_not_exists` found the queue already present
    QueueExists,
}

impl DomainErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QueueExists => "QUEUE_EXISTS",
        }
    }
}

impl fmt::Display for DomainErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged error raised by this crate rather than by the service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error {code}: {message}")]
pub struct DomainError {
    code: DomainErrorCode,
    message: String,
}

impl DomainError {
    pub fn new(code: DomainErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error raised when a queue that should be created already exists
    pub fn queue_exists(queue_name: &str) -> Self {
        Self::new(
            DomainErrorCode::QueueExists,
            format!("Queue exists: {}", queue_name),
        )
    }

    pub fn code(&self) -> DomainErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors building a [`ClientConfig`](crate::ClientConfig)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parsing failed: {message}")]
    Parsing { message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
