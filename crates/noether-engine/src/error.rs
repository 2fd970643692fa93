//! Engine error types

use noether_knowledge::StoreError;

/// Errors from the scheduler and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
