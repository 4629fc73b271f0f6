//! RetrievalEngine: the exposed search surface.
//!
//! Owns the vector index and borrows its collaborators. Each search embeds
//! the query once, fits it per class, and runs one class search per scope
//! member through a fresh `SearchEngine`.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use tracing::{debug, info, warn};
use wayfinder_core::config::{ObservabilityConfig, RetrievalConfig};
use wayfinder_core::entity::{ClassDimensions, EntityClass, EntityId};
use wayfinder_core::errors::{RetrievalError, WayfinderResult};
use wayfinder_core::models::{
    DegradationEvent, EmbeddingMode, IntentTarget, RetrievalContext, SearchScope,
};
use wayfinder_core::traits::{IEmbeddingProvider, IEmbeddingStore, IEntityRepository, IVectorIndex};
use wayfinder_observability::{
    rebuild_span, retrieval_span, DegradationTracker, QueryLog, QueryLogEntry, TrackedDegradation,
};

use crate::context::{AssembledContext, ContextAssembler, ContextLimits};
use crate::index::{IndexConsistencyReport, RebuildReport, VectorIndex};
use crate::search::{SearchEngine, SearchOutcome};

const INDEX_COMPONENT: &str = "vector_index";

pub struct RetrievalEngine<'a> {
    repo: &'a dyn IEntityRepository,
    store: &'a dyn IEmbeddingStore,
    embedder: &'a dyn IEmbeddingProvider,
    index: VectorIndex,
    config: RetrievalConfig,
    pending_events: Mutex<Vec<DegradationEvent>>,
    tracker: Mutex<DegradationTracker>,
    query_log: Mutex<QueryLog>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl<'a> RetrievalEngine<'a> {
    /// Create an engine with every class index unbuilt.
    pub fn new(
        repo: &'a dyn IEntityRepository,
        store: &'a dyn IEmbeddingStore,
        embedder: &'a dyn IEmbeddingProvider,
        config: RetrievalConfig,
    ) -> Self {
        let dimensions = ClassDimensions {
            organization: store.dimensions_for(EntityClass::Organization),
            program: store.dimensions_for(EntityClass::Program),
        };
        Self {
            repo,
            store,
            embedder,
            index: VectorIndex::new(dimensions),
            config,
            pending_events: Mutex::new(Vec::new()),
            tracker: Mutex::new(DegradationTracker::new()),
            query_log: Mutex::new(QueryLog::new()),
        }
    }

    /// Create an engine and, when `rebuild_on_open` is set, build every
    /// class index. A failed rebuild leaves that class on the lexical path.
    pub fn open(
        repo: &'a dyn IEntityRepository,
        store: &'a dyn IEmbeddingStore,
        embedder: &'a dyn IEmbeddingProvider,
        config: RetrievalConfig,
    ) -> Self {
        let rebuild = config.rebuild_on_open;
        let engine = Self::new(repo, store, embedder, config);
        if rebuild {
            for class in EntityClass::ALL {
                if let Err(e) = engine.rebuild_index(class) {
                    warn!(class = %class, error = %e, "initial index rebuild failed");
                }
            }
        }
        engine
    }

    pub fn with_observability(self, config: &ObservabilityConfig) -> Self {
        *lock(&self.query_log) = QueryLog::with_capacity(config.query_log_capacity);
        self
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Search `scope` for `query`, returning up to `limit` results per class.
    ///
    /// # Errors
    /// * `InvalidRequest` for a blank query or `limit == 0`.
    /// * `EmbeddingFailed` when the query cannot be embedded.
    /// * `SearchFailed` when a class's vector and lexical paths both faulted.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        scope: SearchScope,
    ) -> WayfinderResult<RetrievalContext> {
        let span = retrieval_span!(query, scope);
        let _guard = span.enter();
        let started = Instant::now();

        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidRequest {
                reason: "query must not be blank".to_string(),
            }
            .into());
        }
        if limit == 0 {
            return Err(RetrievalError::InvalidRequest {
                reason: "limit must be greater than 0".to_string(),
            }
            .into());
        }

        let vector = self
            .embedder
            .embed(query, EmbeddingMode::Query)
            .map_err(|e| RetrievalError::EmbeddingFailed {
                reason: e.to_string(),
            })?;

        let limits = ContextLimits {
            organizations: limit,
            programs: limit,
        };
        let assembled = self.assemble(scope_target(scope), &vector, query, limits);

        let failures: Vec<String> = assembled
            .outcomes
            .iter()
            .filter_map(|(class, outcome)| match outcome {
                SearchOutcome::Failed { cause } => Some(format!("{class}: {cause}")),
                _ => None,
            })
            .collect();

        lock(&self.query_log).record(QueryLogEntry::new(
            query,
            scope,
            started.elapsed(),
            assembled.context.organizations.len(),
            assembled.context.programs.len(),
            assembled.used_fallback(),
        ));

        if !failures.is_empty() {
            return Err(RetrievalError::SearchFailed {
                reason: failures.join("; "),
            }
            .into());
        }

        info!(
            organizations = assembled.context.organizations.len(),
            programs = assembled.context.programs.len(),
            fallback = assembled.used_fallback(),
            "search complete"
        );
        Ok(assembled.context)
    }

    /// Search the classes `target` includes with an already embedded query.
    pub fn assemble(
        &self,
        target: IntentTarget,
        query_vector: &[f32],
        query_text: &str,
        limits: ContextLimits,
    ) -> AssembledContext {
        let search = SearchEngine::new(self.repo, &self.index);
        let assembled = ContextAssembler::new(&search, self.index_dimensions()).assemble(
            target,
            Some(query_vector),
            Some(query_text),
            limits,
        );

        let events = search.drain_events();
        let mut tracker = lock(&self.tracker);
        if events.is_empty() {
            if !assembled.outcomes.is_empty() && tracker.is_degraded(INDEX_COMPONENT) {
                tracker.mark_recovered(INDEX_COMPONENT);
            }
        } else {
            tracker.record_all(events.iter().cloned());
            lock(&self.pending_events).extend(events);
        }
        assembled
    }

    fn index_dimensions(&self) -> ClassDimensions {
        ClassDimensions {
            organization: self.index.dimensions_for(EntityClass::Organization),
            program: self.index.dimensions_for(EntityClass::Program),
        }
    }

    pub fn rebuild_index(&self, class: EntityClass) -> WayfinderResult<RebuildReport> {
        let span = rebuild_span!(class);
        let _guard = span.enter();
        self.index.rebuild(class, self.store)
    }

    pub fn verify_index(&self, class: EntityClass) -> WayfinderResult<IndexConsistencyReport> {
        self.index.verify(class, self.repo)
    }

    /// Delete an entity with its stored vector and index entry.
    pub fn remove_entity(&self, class: EntityClass, id: EntityId) -> WayfinderResult<bool> {
        let existed = self.repo.delete(class, id)?;
        self.index.remove(class, id)?;
        if class == EntityClass::Organization {
            // Programs cascade with their organization; their entries go
            // stale and are dropped on hydration until the next rebuild.
            debug!(id = %id, "organization removed, program index may hold stale entries");
        }
        Ok(existed)
    }

    /// Events recorded since the last drain.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        std::mem::take(&mut *lock(&self.pending_events))
    }

    pub fn active_degradations(&self) -> Vec<TrackedDegradation> {
        lock(&self.tracker)
            .active_degradations()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn with_query_log<R>(&self, f: impl FnOnce(&QueryLog) -> R) -> R {
        f(&lock(&self.query_log))
    }
}

fn scope_target(scope: SearchScope) -> IntentTarget {
    match scope {
        SearchScope::All => IntentTarget::Both,
        SearchScope::Organizations => IntentTarget::Organization,
        SearchScope::Programs => IntentTarget::Program,
    }
}
