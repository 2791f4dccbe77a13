//! Error types for the prompt store.

use thiserror::Error;

/// Errors returned by store, index, and lineage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller input was rejected before touching storage.
    #[error("validation error: {0}")]
    Validation(String),
    /// A referenced record id does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
    /// IO failure while reading or writing the backing files.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    /// A record or index file failed to serialize or deserialize.
    #[error("storage error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A lineage walk exceeded the store size, indicating corruption.
    #[error("lineage cycle detected at record {0}")]
    CycleDetected(String),
    /// The tag index lock could not be acquired in time.
    #[error("tag index lock timed out after {0:?}")]
    LockTimeout(std::time::Duration),
}

impl StoreError {
    /// Whether this error belongs to the storage class (retryable I/O,
    /// serialization, or lock starvation) rather than bad input.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_) | StoreError::Serde(_) | StoreError::LockTimeout(_)
        )
    }
}
