//! Per-class vector index.
//!
//! Each class holds an `Arc<ClassIndex>` snapshot behind a short-lived
//! `RwLock`. Readers clone the `Arc` and scan without holding the lock.
//! Rebuilds and incremental writes build a replacement snapshot under the
//! class's writer mutex and swap it in, so a reader never sees a partially
//! populated index.

mod class_index;

pub use class_index::{cosine_distance, ClassIndex};

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::{debug, warn};
use wayfinder_core::entity::{ClassDimensions, EntityClass, EntityId};
use wayfinder_core::errors::{
    EmbeddingError, IndexError, StorageError, WayfinderError, WayfinderResult,
};
use wayfinder_core::models::IndexHit;
use wayfinder_core::traits::{IEmbeddingStore, IEntityRepository, IVectorIndex};
use wayfinder_observability::tracing_setup::events;

/// Outcome of a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildReport {
    pub class: EntityClass,
    pub indexed: usize,
    /// Stored vectors of the wrong length or that failed to decode.
    pub skipped: usize,
}

/// Index entries whose entity no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConsistencyReport {
    pub class: EntityClass,
    pub indexed: usize,
    pub stale_ids: Vec<EntityId>,
}

impl IndexConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.stale_ids.is_empty()
    }
}

#[derive(Default)]
struct ClassSlot {
    current: RwLock<Option<Arc<ClassIndex>>>,
    writer: Mutex<()>,
}

impl ClassSlot {
    fn load(&self) -> Option<Arc<ClassIndex>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, next: Option<Arc<ClassIndex>>) {
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

pub struct VectorIndex {
    dimensions: ClassDimensions,
    organizations: ClassSlot,
    programs: ClassSlot,
}

impl VectorIndex {
    /// An index with no class built yet. Every query is `IndexUnavailable`
    /// until `rebuild` runs.
    pub fn new(dimensions: ClassDimensions) -> Self {
        Self {
            dimensions,
            organizations: ClassSlot::default(),
            programs: ClassSlot::default(),
        }
    }

    fn slot(&self, class: EntityClass) -> &ClassSlot {
        match class {
            EntityClass::Organization => &self.organizations,
            EntityClass::Program => &self.programs,
        }
    }

    pub fn dimensions_for(&self, class: EntityClass) -> usize {
        self.dimensions.for_class(class)
    }

    /// Replace the class index with one built from the store.
    ///
    /// # Errors
    /// A failed store scan leaves the previous index in place.
    pub fn rebuild(
        &self,
        class: EntityClass,
        store: &dyn IEmbeddingStore,
    ) -> WayfinderResult<RebuildReport> {
        let slot = self.slot(class);
        let _writer = slot.lock_writer();
        let dims = self.dimensions_for(class);

        let mut next = ClassIndex::new(dims);
        let mut skipped = 0;
        for row in store.get_all(class) {
            let stored = match row {
                Ok(stored) => stored,
                Err(WayfinderError::StorageError(e @ StorageError::CorruptEmbedding { .. })) => {
                    warn!(class = %class, error = %e, "skipping undecodable stored vector");
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            if stored.vector.len() != dims {
                warn!(
                    class = %class,
                    id = %stored.entity_id,
                    expected = dims,
                    actual = stored.vector.len(),
                    "skipping stored vector with wrong dimensions"
                );
                skipped += 1;
                continue;
            }
            next.insert(stored.entity_id, stored.vector);
        }

        let report = RebuildReport {
            class,
            indexed: next.len(),
            skipped,
        };
        slot.store(Some(Arc::new(next)));
        events::index_rebuilt(class.as_str(), report.indexed, report.skipped);
        Ok(report)
    }

    /// Mark the class unavailable until the next rebuild.
    pub fn invalidate(&self, class: EntityClass) {
        let slot = self.slot(class);
        let _writer = slot.lock_writer();
        slot.store(None);
        warn!(class = %class, "vector index invalidated");
    }

    pub fn is_available(&self, class: EntityClass) -> bool {
        self.slot(class).load().is_some()
    }

    /// Entry count, or `None` when the class is unavailable.
    pub fn len(&self, class: EntityClass) -> Option<usize> {
        self.slot(class).load().map(|idx| idx.len())
    }

    /// List index entries whose entity no longer exists in `repo`.
    ///
    /// # Errors
    /// `IndexUnavailable` when the class was never built.
    pub fn verify(
        &self,
        class: EntityClass,
        repo: &dyn IEntityRepository,
    ) -> WayfinderResult<IndexConsistencyReport> {
        let snapshot = self
            .slot(class)
            .load()
            .ok_or_else(|| IndexError::unavailable(class, "index not built"))?;

        let mut stale_ids = Vec::new();
        for id in snapshot.ids() {
            if repo.get_by_id(class, id)?.is_none() {
                stale_ids.push(id);
            }
        }
        if !stale_ids.is_empty() {
            warn!(class = %class, stale = stale_ids.len(), "index holds stale entries");
        }
        Ok(IndexConsistencyReport {
            class,
            indexed: snapshot.len(),
            stale_ids,
        })
    }

    fn check_vector(&self, class: EntityClass, vector: &[f32]) -> WayfinderResult<()> {
        let expected = self.dimensions_for(class);
        if vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::InvalidVector {
                reason: "vector contains non-finite components".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl IVectorIndex for VectorIndex {
    fn query(
        &self,
        class: EntityClass,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<IndexHit>, IndexError> {
        let snapshot = self
            .slot(class)
            .load()
            .ok_or_else(|| IndexError::unavailable(class, "index not built or invalidated"))?;
        if vector.len() != snapshot.dimensions() {
            return Err(IndexError::unavailable(
                class,
                format!(
                    "query has {} dimensions, index expects {}",
                    vector.len(),
                    snapshot.dimensions()
                ),
            ));
        }
        Ok(snapshot.search(vector, k))
    }

    /// No-op while the class is unbuilt; the next rebuild reads the store.
    fn upsert(&self, class: EntityClass, id: EntityId, vector: &[f32]) -> WayfinderResult<()> {
        self.check_vector(class, vector)?;
        let slot = self.slot(class);
        let _writer = slot.lock_writer();
        let Some(current) = slot.load() else {
            debug!(class = %class, id = %id, "index not built, upsert deferred to rebuild");
            return Ok(());
        };
        let mut next = ClassIndex::clone(&current);
        next.insert(id, vector.to_vec());
        slot.store(Some(Arc::new(next)));
        Ok(())
    }

    fn remove(&self, class: EntityClass, id: EntityId) -> WayfinderResult<bool> {
        let slot = self.slot(class);
        let _writer = slot.lock_writer();
        let Some(current) = slot.load() else {
            return Ok(false);
        };
        if !current.contains(id) {
            return Ok(false);
        }
        let mut next = ClassIndex::clone(&current);
        next.remove(id);
        slot.store(Some(Arc::new(next)));
        Ok(true)
    }
}
