//! Error types for taskdeck persistence adapters.

use taskdeck_core::TaskId;
use thiserror::Error;

/// Errors that can occur while talking to a task store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or server failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The record no longer exists in the store.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// The store refused the payload.
    #[error("rejected by store: {0}")]
    Validation(String),

    /// A stored document could not be decoded or encoded.
    #[error("malformed store document: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the store reported the record as gone.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
