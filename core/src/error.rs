//! Error types for the API client.
//!
//! # Design
//! One variant per pipeline stage: marshal, transport, status, unmarshal.
//! A timeout and a caller cancellation are reported as their own variants but
//! belong to the transport class (`is_transport`). Every variant that has an
//! underlying cause keeps it as `source()`.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request body could not be serialized to JSON.
    #[error("failed to marshal request data: {0}")]
    Marshal(#[source] serde_json::Error),

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// No complete response arrived within the per-request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller's cancellation fired before the response completed.
    #[error("request cancelled")]
    Cancelled,

    /// The server answered outside `[200, 300)`. `body` is the raw text.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A success response body was not valid JSON for the target type.
    #[error("failed to parse JSON response: {0}")]
    Unmarshal(#[source] serde_json::Error),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Timeout(_) | ClientError::Cancelled
        )
    }

    /// The HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
