//! Per-class similarity search with lexical fallback.
//!
//! The vector path queries the index with `k = limit` and hydrates each hit
//! through the repository. If the index is unavailable, or hydration hits a
//! storage fault, or no query vector was supplied, the search falls back to a
//! case-insensitive substring match over the class's text fields, scoring
//! every match `LEXICAL_FALLBACK_SCORE`.

pub mod score;

use std::sync::Mutex;

use tracing::{debug, warn};
use wayfinder_core::constants::LEXICAL_FALLBACK_SCORE;
use wayfinder_core::entity::{Entity, EntityClass};
use wayfinder_core::errors::IndexError;
use wayfinder_core::models::{DegradationEvent, MatchSource, SearchResult};
use wayfinder_core::traits::{IEntityRepository, IVectorIndex};
use wayfinder_observability::tracing_setup::events;

pub use score::distance_to_similarity;

/// What a single-class search produced, and how.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results from the vector index, ascending distance.
    Vector(Vec<SearchResult>),
    /// The vector path was skipped or failed; results come from text matching.
    Lexical {
        cause: String,
        results: Vec<SearchResult>,
    },
    /// Nothing could be searched and there was no text to fall back on.
    Empty { cause: String },
    /// Both paths faulted.
    Failed { cause: String },
}

impl SearchOutcome {
    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchOutcome::Vector(results) | SearchOutcome::Lexical { results, .. } => results,
            SearchOutcome::Empty { .. } | SearchOutcome::Failed { .. } => &[],
        }
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            SearchOutcome::Vector(results) | SearchOutcome::Lexical { results, .. } => results,
            SearchOutcome::Empty { .. } | SearchOutcome::Failed { .. } => Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, SearchOutcome::Vector(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SearchOutcome::Failed { .. })
    }
}

/// Why the vector path did not produce results.
enum VectorFault {
    Index(IndexError),
    Storage(String),
}

pub struct SearchEngine<'a> {
    repo: &'a dyn IEntityRepository,
    index: &'a dyn IVectorIndex,
    events: Mutex<Vec<DegradationEvent>>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(repo: &'a dyn IEntityRepository, index: &'a dyn IVectorIndex) -> Self {
        Self {
            repo,
            index,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Search one class. Never returns an error: faults become
    /// `Lexical`, `Empty` or `Failed` outcomes.
    pub fn search(
        &self,
        class: EntityClass,
        query_vector: Option<&[f32]>,
        query_text: Option<&str>,
        limit: usize,
    ) -> SearchOutcome {
        if limit == 0 {
            return SearchOutcome::Vector(Vec::new());
        }

        let cause = match query_vector {
            Some(vector) => match self.vector_search(class, vector, limit) {
                Ok(results) => return SearchOutcome::Vector(results),
                Err(VectorFault::Index(e)) => e.to_string(),
                Err(VectorFault::Storage(reason)) => reason,
            },
            None => "no query vector".to_string(),
        };

        let text = query_text.map(str::trim).filter(|t| !t.is_empty());
        let Some(text) = text else {
            debug!(class = %class, cause = %cause, "vector path unavailable and no query text");
            return SearchOutcome::Empty { cause };
        };

        match self.repo.find_by_text(class, text, limit) {
            Ok(entities) => {
                self.record_fallback(&cause);
                let results = entities
                    .into_iter()
                    .map(|e| self.project(e, LEXICAL_FALLBACK_SCORE, MatchSource::Lexical))
                    .collect();
                SearchOutcome::Lexical { cause, results }
            }
            Err(e) => {
                warn!(class = %class, error = %e, cause = %cause, "lexical fallback failed");
                SearchOutcome::Failed {
                    cause: format!("{cause}; lexical fallback: {e}"),
                }
            }
        }
    }

    fn vector_search(
        &self,
        class: EntityClass,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>, VectorFault> {
        let hits = self.index.query(class, vector, limit).map_err(VectorFault::Index)?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            match self.repo.get_by_id(class, hit.entity_id) {
                Ok(Some(entity)) => results.push(self.project(
                    entity,
                    distance_to_similarity(hit.distance),
                    MatchSource::Vector,
                )),
                Ok(None) => {
                    let stale = IndexError::StaleIndexEntry {
                        class,
                        id: hit.entity_id,
                    };
                    debug!(error = %stale, "dropping hit");
                    events::stale_entry_dropped(class.as_str(), hit.entity_id.get());
                }
                Err(e) => return Err(VectorFault::Storage(format!("hydration failed: {e}"))),
            }
        }
        Ok(results)
    }

    /// Attach the owning organization's name to programs.
    fn project(
        &self,
        entity: Entity,
        similarity_score: f64,
        match_source: MatchSource,
    ) -> SearchResult {
        let organization_name = entity.record.as_program().and_then(|p| {
            match self.repo.get_by_id(EntityClass::Organization, p.organization_id) {
                Ok(org) => org.map(|o| o.name().to_string()),
                Err(e) => {
                    warn!(id = %p.organization_id, error = %e, "organization lookup failed");
                    None
                }
            }
        });
        SearchResult {
            entity,
            organization_name,
            similarity_score,
            match_source,
        }
    }

    fn record_fallback(&self, cause: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(DegradationEvent::now("vector_index", cause, "lexical"));
        }
    }

    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}
