use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::llm_client::LlmError;
use crate::normalize::NormalizeError;

/// Classification of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    HttpStatus,
    MalformedResponse,
    Timeout,
    Validation,
}

impl ErrorKind {
    /// The message shown to users. Technical detail stays in the logs.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Network => {
                "Could not reach the service. Please check your connection and try again."
            }
            ErrorKind::HttpStatus => "The service returned an error. Please try again.",
            ErrorKind::MalformedResponse => "Analysis failed. Please try again.",
            ErrorKind::Timeout => "The request is taking too long. Please try again.",
            ErrorKind::Validation => "The request was rejected as invalid.",
        }
    }

    /// Timeouts and validation failures are never retried automatically:
    /// the first would loop, the second cannot succeed with the same input.
    pub fn allows_automatic_retry(self) -> bool {
        !matches!(self, ErrorKind::Timeout | ErrorKind::Validation)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::HttpStatus => "http_status",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// Failure of one external call. `message` is user-facing, `detail` is for
/// diagnostics only.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail}")]
pub struct CallError {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: String,
}

impl CallError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            message: kind.user_message().to_string(),
            detail: detail.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("no response within {}ms", after.as_millis()),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::Validation,
            detail: message.clone(),
            message,
        }
    }
}

impl From<LlmError> for CallError {
    fn from(err: LlmError) -> Self {
        let kind = match &err {
            LlmError::Http(e) if e.is_timeout() => ErrorKind::Timeout,
            LlmError::Http(e) if e.is_decode() => ErrorKind::MalformedResponse,
            LlmError::Http(_) => ErrorKind::Network,
            LlmError::Api { .. } | LlmError::MissingCredential => ErrorKind::HttpStatus,
            LlmError::Parse(_) | LlmError::EmptyContent => ErrorKind::MalformedResponse,
        };
        CallError::new(kind, err.to_string())
    }
}

impl From<NormalizeError> for CallError {
    fn from(err: NormalizeError) -> Self {
        CallError::new(ErrorKind::MalformedResponse, err.to_string())
    }
}

/// Misuse of an operation handle or registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("operation has been disposed")]
    Disposed,

    #[error("no previous attempt to retry")]
    NothingToRetry,

    #[error("operation {0} not found")]
    NotFound(Uuid),
}
