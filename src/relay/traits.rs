//! Trait abstraction for the form relay to enable mocking in tests

use super::payload::SubmissionPayload;
use async_trait::async_trait;
use thiserror::Error;

/// Why a relay delivery failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The endpoint answered with a non-success status
    #[error("relay rejected submission with status {status}")]
    Rejected { status: u16, detail: Option<String> },

    #[error("relay request timed out")]
    Timeout,

    /// Connection, TLS or protocol failure before a response arrived
    #[error("relay request failed: {0}")]
    Transport(String),
}

impl RelayError {
    /// Server-provided text suitable for showing to the visitor
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Timeout | Self::Transport(_) => None,
        }
    }
}

/// Delivers a captured submission to a form relay endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRelay: Send + Sync {
    /// POST the payload once. `Ok` means the endpoint answered 2xx.
    async fn deliver(&self, endpoint: &str, payload: &SubmissionPayload) -> Result<(), RelayError>;
}
