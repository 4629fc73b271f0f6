//! Backfill worker.
//!
//! Embeds every entity of a class that has no stored vector, in batches of
//! `batch_size`. A batch is first sent as one provider call; if that fails
//! each entity is embedded on its own. Per-entity failures are counted and
//! skipped, never aborting the run.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};
use wayfinder_core::constants::MAX_BACKFILL_BATCH_SIZE;
use wayfinder_core::entity::{Entity, EntityClass, EntityId};
use wayfinder_core::errors::WayfinderResult;
use wayfinder_core::models::EmbeddingMode;
use wayfinder_core::traits::{IEmbeddingProvider, IEmbeddingStore, IEntityRepository, IVectorIndex};

use crate::normalize::fit_dimensions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub embedded: usize,
    pub failed: usize,
}

pub struct BackfillWorker {
    batch_size: usize,
}

impl BackfillWorker {
    /// `batch_size` is clamped to `1..=MAX_BACKFILL_BATCH_SIZE`.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.clamp(1, MAX_BACKFILL_BATCH_SIZE),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embed all unembedded entities of `class`. When `index` is given each
    /// stored vector is also upserted into it.
    ///
    /// # Errors
    /// Only repository listing faults abort the run.
    pub fn run(
        &self,
        class: EntityClass,
        repo: &dyn IEntityRepository,
        store: &dyn IEmbeddingStore,
        provider: &dyn IEmbeddingProvider,
        index: Option<&dyn IVectorIndex>,
    ) -> WayfinderResult<BackfillReport> {
        let mut report = BackfillReport::default();
        let mut failed: HashSet<EntityId> = HashSet::new();
        let mut org_names: HashMap<EntityId, String> = HashMap::new();
        let dims = store.dimensions_for(class);

        loop {
            // Failed entities stay unembedded, so over-fetch past them.
            let batch: Vec<Entity> = repo
                .list_unembedded(class, self.batch_size + failed.len())?
                .into_iter()
                .filter(|e| !failed.contains(&e.id))
                .take(self.batch_size)
                .collect();
            if batch.is_empty() {
                break;
            }

            let texts = batch
                .iter()
                .map(|e| document_text(e, repo, &mut org_names))
                .collect::<Vec<_>>();

            for (entity, vector) in batch.iter().zip(embed_batch(provider, &texts)) {
                let outcome = vector
                    .and_then(|v| fit_dimensions(v, dims))
                    .and_then(|v| store.put(entity.id, class, &v).map(|()| v))
                    .and_then(|v| match index {
                        Some(index) => index.upsert(class, entity.id, &v),
                        None => Ok(()),
                    });
                match outcome {
                    Ok(()) => report.embedded += 1,
                    Err(e) => {
                        warn!(
                            class = %class,
                            id = %entity.id,
                            error = %e,
                            "backfill failed for entity"
                        );
                        failed.insert(entity.id);
                        report.failed += 1;
                    }
                }
            }
            debug!(
                class = %class,
                embedded = report.embedded,
                failed = report.failed,
                "backfill batch done"
            );
        }

        info!(
            class = %class,
            embedded = report.embedded,
            failed = report.failed,
            "backfill complete"
        );
        Ok(report)
    }
}

/// Batch first, then one at a time. Output is aligned with `texts`.
fn embed_batch(
    provider: &dyn IEmbeddingProvider,
    texts: &[String],
) -> Vec<WayfinderResult<Vec<f32>>> {
    match provider.embed_batch(texts, EmbeddingMode::Document) {
        Ok(vectors) if vectors.len() == texts.len() => vectors.into_iter().map(Ok).collect(),
        Ok(vectors) => {
            warn!(
                expected = texts.len(),
                actual = vectors.len(),
                "batch size mismatch, embedding individually"
            );
            embed_each(provider, texts)
        }
        Err(e) => {
            warn!(error = %e, "batch embedding failed, embedding individually");
            embed_each(provider, texts)
        }
    }
}

fn embed_each(
    provider: &dyn IEmbeddingProvider,
    texts: &[String],
) -> Vec<WayfinderResult<Vec<f32>>> {
    texts
        .iter()
        .map(|t| provider.embed(t, EmbeddingMode::Document))
        .collect()
}

/// Document text, resolving a program's organization name through the repo.
fn document_text(
    entity: &Entity,
    repo: &dyn IEntityRepository,
    org_names: &mut HashMap<EntityId, String>,
) -> String {
    let Some(program) = entity.record.as_program() else {
        return entity.record.embedding_text(None);
    };
    let org_id = program.organization_id;
    if !org_names.contains_key(&org_id) {
        let name = match repo.get_by_id(EntityClass::Organization, org_id) {
            Ok(Some(org)) => org.name().to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                warn!(id = %org_id, error = %e, "organization lookup failed during backfill");
                String::new()
            }
        };
        org_names.insert(org_id, name);
    }
    let name = org_names.get(&org_id).map(String::as_str).filter(|n| !n.is_empty());
    entity.record.embedding_text(name)
}
