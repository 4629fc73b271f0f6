use crate::entity::{Entity, EntityClass, EntityId, EntityRecord};
use crate::errors::WayfinderResult;
use crate::models::StoredEmbedding;

/// Lazy scan over stored embeddings. Every call to `get_all` starts a fresh one.
pub type EmbeddingScan<'a> = Box<dyn Iterator<Item = WayfinderResult<StoredEmbedding>> + Send + 'a>;

/// Record store for organizations and programs.
pub trait IEntityRepository: Send + Sync {
    fn get_by_id(&self, class: EntityClass, id: EntityId) -> WayfinderResult<Option<Entity>>;

    /// Insert or update by natural key. Returns the stable id.
    fn upsert(&self, record: &EntityRecord) -> WayfinderResult<EntityId>;

    /// Case-insensitive substring match over the class's textual fields,
    /// ordered by ascending id.
    fn find_by_text(
        &self,
        class: EntityClass,
        text: &str,
        limit: usize,
    ) -> WayfinderResult<Vec<Entity>>;

    /// Delete an entity and its stored embedding. Returns whether it existed.
    fn delete(&self, class: EntityClass, id: EntityId) -> WayfinderResult<bool>;

    /// Entities of `class` with no stored embedding, ascending id.
    fn list_unembedded(&self, class: EntityClass, limit: usize) -> WayfinderResult<Vec<Entity>>;
}

/// Persistent vectors, one per (class, entity id).
pub trait IEmbeddingStore: Send + Sync {
    /// Configured dimensionality for `class`.
    fn dimensions_for(&self, class: EntityClass) -> usize;

    /// Upsert a vector. Rejects wrong-length or non-finite vectors and leaves
    /// the store unchanged on failure.
    fn put(&self, id: EntityId, class: EntityClass, vector: &[f32]) -> WayfinderResult<()>;

    fn get_all(&self, class: EntityClass) -> EmbeddingScan<'_>;

    fn delete(&self, class: EntityClass, id: EntityId) -> WayfinderResult<bool>;

    fn count(&self, class: EntityClass) -> WayfinderResult<usize>;
}
