//! Error types for memory operations.

/// Errors returned by the memory tiers and their backends.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Backing store could not be reached. Recoverable; callers may retry
    /// the whole turn.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// Malformed input, such as an importance outside [0, 1] or an empty
    /// conversation id. Fatal to the call, never retried.
    #[error("validation error: {0}")]
    Validation(String),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Similarity index error.
    #[error("index error: {0}")]
    Index(String),
}
