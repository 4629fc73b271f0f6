//! StorageEngine: owns the ConnectionPool, implements IEntityRepository and
//! IEmbeddingStore, runs migrations on open.

use std::collections::VecDeque;
use std::path::Path;

use rusqlite::Connection;

use wayfinder_core::config::StorageConfig;
use wayfinder_core::constants::EMBEDDING_SCAN_PAGE_SIZE;
use wayfinder_core::entity::{ClassDimensions, Entity, EntityClass, EntityId, EntityRecord};
use wayfinder_core::errors::{EmbeddingError, WayfinderResult};
use wayfinder_core::models::StoredEmbedding;
use wayfinder_core::traits::{EmbeddingScan, IEmbeddingStore, IEntityRepository};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{embedding_ops, entity_crud, entity_search};

/// The main storage engine.
pub struct StorageEngine {
    pool: ConnectionPool,
    dimensions: ClassDimensions,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, dimensions: ClassDimensions) -> WayfinderResult<Self> {
        Self::open_with_config(path, &StorageConfig::default(), dimensions)
    }

    pub fn open_with_config(
        path: &Path,
        config: &StorageConfig,
        dimensions: ClassDimensions,
    ) -> WayfinderResult<Self> {
        let pool = ConnectionPool::open(path, config)?;
        pool.writer.with_conn(migrations::run_migrations)?;
        tracing::info!(path = %path.display(), readers = pool.reader_count(), "storage opened");
        Ok(Self { pool, dimensions })
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory(dimensions: ClassDimensions) -> WayfinderResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.writer.with_conn(migrations::run_migrations)?;
        Ok(Self { pool, dimensions })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn dimensions(&self) -> ClassDimensions {
        self.dimensions
    }

    fn with_reader<F, T>(&self, f: F) -> WayfinderResult<T>
    where
        F: FnOnce(&Connection) -> WayfinderResult<T>,
    {
        self.pool.read(f)
    }

    /// Stored vector for one entity, if any.
    pub fn get_embedding(
        &self,
        class: EntityClass,
        id: EntityId,
    ) -> WayfinderResult<Option<Vec<f32>>> {
        self.with_reader(|conn| embedding_ops::get_embedding(conn, class, id))
    }

    pub fn count_entities(&self, class: EntityClass) -> WayfinderResult<usize> {
        self.with_reader(|conn| entity_crud::count_entities(conn, class))
    }

    fn validate_vector(&self, class: EntityClass, vector: &[f32]) -> WayfinderResult<()> {
        let expected = self.dimensions.for_class(class);
        if vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }
        if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
            return Err(EmbeddingError::InvalidVector {
                reason: format!("non-finite component at index {pos}"),
            }
            .into());
        }
        Ok(())
    }
}

impl IEntityRepository for StorageEngine {
    fn get_by_id(&self, class: EntityClass, id: EntityId) -> WayfinderResult<Option<Entity>> {
        self.with_reader(|conn| entity_crud::get_entity(conn, class, id))
    }

    fn upsert(&self, record: &EntityRecord) -> WayfinderResult<EntityId> {
        self.pool
            .writer
            .with_conn(|conn| entity_crud::upsert_entity(conn, record))
    }

    fn find_by_text(
        &self,
        class: EntityClass,
        text: &str,
        limit: usize,
    ) -> WayfinderResult<Vec<Entity>> {
        self.with_reader(|conn| entity_search::find_by_text(conn, class, text, limit))
    }

    fn delete(&self, class: EntityClass, id: EntityId) -> WayfinderResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| entity_crud::delete_entity(conn, class, id))
    }

    fn list_unembedded(&self, class: EntityClass, limit: usize) -> WayfinderResult<Vec<Entity>> {
        self.with_reader(|conn| entity_crud::list_unembedded(conn, class, limit))
    }
}

impl IEmbeddingStore for StorageEngine {
    fn dimensions_for(&self, class: EntityClass) -> usize {
        self.dimensions.for_class(class)
    }

    fn put(&self, id: EntityId, class: EntityClass, vector: &[f32]) -> WayfinderResult<()> {
        self.validate_vector(class, vector)?;
        self.pool
            .writer
            .with_conn(|conn| embedding_ops::put_embedding(conn, class, id, vector))
    }

    fn get_all(&self, class: EntityClass) -> EmbeddingScan<'_> {
        Box::new(EmbeddingScanIter {
            engine: self,
            class,
            after: None,
            buffer: VecDeque::new(),
            exhausted: false,
        })
    }

    fn delete(&self, class: EntityClass, id: EntityId) -> WayfinderResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| embedding_ops::delete_embedding(conn, class, id))
    }

    fn count(&self, class: EntityClass) -> WayfinderResult<usize> {
        self.with_reader(|conn| embedding_ops::count_embeddings(conn, class))
    }
}

/// Keyset-paginated scan. Holds no connection between pages, so a long scan
/// never blocks writers; rows written after the cursor passes are not seen.
struct EmbeddingScanIter<'a> {
    engine: &'a StorageEngine,
    class: EntityClass,
    after: Option<EntityId>,
    buffer: VecDeque<WayfinderResult<StoredEmbedding>>,
    exhausted: bool,
}

impl EmbeddingScanIter<'_> {
    fn fill(&mut self) -> WayfinderResult<()> {
        let page = self.engine.with_reader(|conn| {
            embedding_ops::scan_page(conn, self.class, self.after, EMBEDDING_SCAN_PAGE_SIZE)
        })?;
        if page.len() < EMBEDDING_SCAN_PAGE_SIZE {
            self.exhausted = true;
        }
        if let Some((last, _)) = page.last() {
            self.after = Some(*last);
        }
        self.buffer.extend(page.into_iter().map(|(entity_id, decoded)| {
            decoded.map(|vector| StoredEmbedding { entity_id, vector })
        }));
        Ok(())
    }
}

impl Iterator for EmbeddingScanIter<'_> {
    type Item = WayfinderResult<StoredEmbedding>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front()
    }
}
