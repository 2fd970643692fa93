//! Store error types

/// Errors from the knowledge store and its persistence layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
