//! Integration test: backfill against a real storage engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use wayfinder_core::config::EmbeddingConfig;
use wayfinder_core::entity::*;
use wayfinder_core::errors::{EmbeddingError, IndexError, WayfinderResult};
use wayfinder_core::models::{EmbeddingMode, IndexHit};
use wayfinder_core::traits::{IEmbeddingProvider, IEmbeddingStore, IEntityRepository, IVectorIndex};
use wayfinder_embeddings::{BackfillWorker, EmbeddingEngine, HashedTfIdfProvider};
use wayfinder_storage::StorageEngine;

fn seeded(dims: usize) -> (StorageEngine, test_fixtures::SeededIds) {
    let storage = StorageEngine::open_in_memory(ClassDimensions::uniform(dims)).unwrap();
    let ids = test_fixtures::seed_catalog(&storage, &test_fixtures::load_catalog()).unwrap();
    (storage, ids)
}

/// Fails for any text containing `poison`; batch calls always fail so the
/// worker must fall back to per-entity embedding.
struct PickyProvider {
    poison: &'static str,
    calls: AtomicUsize,
}

impl IEmbeddingProvider for PickyProvider {
    fn embed(&self, text: &str, _mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains(self.poison) {
            return Err(EmbeddingError::InferenceFailed {
                reason: "poisoned".to_string(),
            }
            .into());
        }
        Ok(vec![1.0, 0.0, 0.0, 0.0])
    }
    fn embed_batch(
        &self,
        _texts: &[String],
        _mode: EmbeddingMode,
    ) -> WayfinderResult<Vec<Vec<f32>>> {
        Err(EmbeddingError::InferenceFailed {
            reason: "batch disabled".to_string(),
        }
        .into())
    }
    fn dimensions(&self) -> usize {
        4
    }
    fn name(&self) -> &str {
        "picky"
    }
    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct RecordingIndex {
    upserts: Mutex<Vec<(EntityClass, EntityId)>>,
}

impl IVectorIndex for RecordingIndex {
    fn query(
        &self,
        class: EntityClass,
        _vector: &[f32],
        _k: usize,
    ) -> Result<Vec<IndexHit>, IndexError> {
        Err(IndexError::unavailable(class, "recording only"))
    }
    fn upsert(&self, class: EntityClass, id: EntityId, _vector: &[f32]) -> WayfinderResult<()> {
        self.upserts.lock().unwrap().push((class, id));
        Ok(())
    }
    fn remove(&self, _class: EntityClass, _id: EntityId) -> WayfinderResult<bool> {
        Ok(false)
    }
}

#[test]
fn backfill_embeds_every_entity_once() {
    let (storage, ids) = seeded(16);
    let provider = HashedTfIdfProvider::new(16);
    let worker = BackfillWorker::new(2);

    let orgs = worker
        .run(EntityClass::Organization, &storage, &storage, &provider, None)
        .unwrap();
    assert_eq!(orgs.embedded, ids.organizations.len());
    assert_eq!(orgs.failed, 0);
    assert_eq!(storage.count(EntityClass::Organization).unwrap(), ids.organizations.len());

    let progs = worker
        .run(EntityClass::Program, &storage, &storage, &provider, None)
        .unwrap();
    assert_eq!(progs.embedded, ids.programs.len());

    let again = worker
        .run(EntityClass::Program, &storage, &storage, &provider, None)
        .unwrap();
    assert_eq!(again.embedded, 0);
}

#[test]
fn backfill_skips_already_embedded() {
    let (storage, ids) = seeded(4);
    storage
        .put(ids.organizations[0], EntityClass::Organization, &[0.0, 0.0, 0.0, 1.0])
        .unwrap();

    let provider = PickyProvider {
        poison: "never-matches",
        calls: AtomicUsize::new(0),
    };
    let report = BackfillWorker::new(10)
        .run(EntityClass::Organization, &storage, &storage, &provider, None)
        .unwrap();

    assert_eq!(report.embedded, ids.organizations.len() - 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), ids.organizations.len() - 1);
    let kept = storage
        .get_embedding(EntityClass::Organization, ids.organizations[0])
        .unwrap();
    assert_eq!(kept, Some(vec![0.0, 0.0, 0.0, 1.0]));
}

#[test]
fn failures_are_counted_and_do_not_abort() {
    let (storage, ids) = seeded(4);
    let provider = PickyProvider {
        poison: "Alpine",
        calls: AtomicUsize::new(0),
    };
    let report = BackfillWorker::new(1)
        .run(EntityClass::Organization, &storage, &storage, &provider, None)
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.embedded, ids.organizations.len() - 1);
    assert_eq!(
        storage.list_unembedded(EntityClass::Organization, 10).unwrap().len(),
        1
    );
}

#[test]
fn program_text_includes_organization_name() {
    let (storage, ids) = seeded(4);
    // Every program is offered by a named organization; poisoning on one
    // organization's name fails exactly that organization's programs.
    let provider = PickyProvider {
        poison: "University: Northbridge",
        calls: AtomicUsize::new(0),
    };
    let report = BackfillWorker::new(10)
        .run(EntityClass::Program, &storage, &storage, &provider, None)
        .unwrap();
    assert_eq!(report.failed, 2);
    assert_eq!(report.embedded, ids.programs.len() - 2);
}

#[test]
fn stored_vectors_are_pushed_to_index() {
    let (storage, ids) = seeded(8);
    let index = RecordingIndex::default();
    let engine = EmbeddingEngine::new(EmbeddingConfig {
        provider: "hashed".to_string(),
        dimensions: 8,
        ..Default::default()
    });

    let report = BackfillWorker::new(50)
        .run(EntityClass::Organization, &storage, &storage, &engine, Some(&index))
        .unwrap();
    assert_eq!(report.embedded, ids.organizations.len());

    let upserts = index.upserts.lock().unwrap();
    let mut seen: Vec<EntityId> = upserts.iter().map(|(_, id)| *id).collect();
    seen.sort();
    assert_eq!(seen, ids.organizations);
}

#[test]
fn vectors_are_fitted_to_store_dimensions() {
    let storage = StorageEngine::open_in_memory(ClassDimensions {
        organization: 2,
        program: 6,
    })
    .unwrap();
    let org = storage
        .upsert(&EntityRecord::Organization(Organization::new("Solo College")))
        .unwrap();

    let provider = PickyProvider {
        poison: "never-matches",
        calls: AtomicUsize::new(0),
    };
    BackfillWorker::new(5)
        .run(EntityClass::Organization, &storage, &storage, &provider, None)
        .unwrap();
    assert_eq!(
        storage.get_embedding(EntityClass::Organization, org).unwrap(),
        Some(vec![1.0, 0.0])
    );
}
