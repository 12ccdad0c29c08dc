//! Error types for document ingestion.

use thiserror::Error;

/// Errors raised while turning document bytes into fragments.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The provider could not be reached or the connection dropped.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The provider's response body could not be decoded.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The adapter is misconfigured (missing credential, bad URL).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The caller supplied an empty document.
    #[error("empty document")]
    EmptyDocument,
}

impl IngestionError {
    /// Returns true if the failure happened before a response was received.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
