//! Common error types for storage access.
//!
//! Handlers treat a missing record as an empty result, never as an error, so
//! `StoreError` only covers genuine infrastructure failures (connectivity,
//! malformed rows). Callers decide per call site whether a failure aborts the
//! invocation or degrades to a reduced result set.

use thiserror::Error;

/// Storage access error
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Injected failure (in-memory store fault injection, test only)
    #[error("Injected store failure: {0}")]
    Injected(String),
}

/// Storage result type alias
pub type StoreResult<T> = Result<T, StoreError>;
