use crate::entity::{EntityClass, EntityId};
use crate::errors::{IndexError, WayfinderResult};
use crate::models::IndexHit;

/// Nearest-neighbour lookup over one class's embeddings.
pub trait IVectorIndex: Send + Sync {
    /// Up to `k` hits ordered by ascending distance, ties by ascending id.
    fn query(
        &self,
        class: EntityClass,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<IndexHit>, IndexError>;

    /// Insert or replace one entry.
    fn upsert(&self, class: EntityClass, id: EntityId, vector: &[f32]) -> WayfinderResult<()>;

    /// Remove one entry. Returns whether it was present.
    fn remove(&self, class: EntityClass, id: EntityId) -> WayfinderResult<bool>;
}
