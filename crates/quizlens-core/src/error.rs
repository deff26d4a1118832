//! Store error types.
//!
//! These represent structural failures at the attempt/report store boundary,
//! the only failures the analytics engine propagates. Defined in
//! `quizlens-core` so callers can classify errors for retry decisions
//! without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading from or writing to a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store was readable but its contents could not be decoded.
    #[error("corrupt store data in {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    /// An I/O error occurred while accessing the store.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of store contents failed.
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns `true` if the operation may succeed on retry. The engine is
    /// pure and side-effect-free, so retrying transient failures is safe.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}
