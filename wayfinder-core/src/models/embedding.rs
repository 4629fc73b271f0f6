use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Whether text is embedded for storage or for querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingMode {
    Document,
    Query,
}

impl EmbeddingMode {
    /// Task type understood by the remote embedding API.
    pub fn task_type(&self) -> &'static str {
        match self {
            EmbeddingMode::Document => "RETRIEVAL_DOCUMENT",
            EmbeddingMode::Query => "RETRIEVAL_QUERY",
        }
    }
}

/// One row of the embedding store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEmbedding {
    pub entity_id: EntityId,
    pub vector: Vec<f32>,
}

/// A vector index match. `distance` is cosine distance in `[0, 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub entity_id: EntityId,
    pub distance: f64,
}
