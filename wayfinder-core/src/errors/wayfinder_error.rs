use crate::entity::{EntityClass, EntityId};

use super::{ConfigError, EmbeddingError, IndexError, RetrievalError, StorageError};

/// Convenience alias used across the workspace.
pub type WayfinderResult<T> = Result<T, WayfinderError>;

/// Root error type for the Wayfinder system.
#[derive(Debug, thiserror::Error)]
pub enum WayfinderError {
    #[error("{class} not found: {id}")]
    EntityNotFound { class: EntityClass, id: EntityId },

    #[error("invalid {class} record: {reason}")]
    InvalidEntity { class: EntityClass, reason: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("index error: {0}")]
    IndexError(#[from] IndexError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl WayfinderError {
    /// Whether this error came from the vector index path.
    pub fn is_index_fault(&self) -> bool {
        matches!(self, WayfinderError::IndexError(_))
    }
}
