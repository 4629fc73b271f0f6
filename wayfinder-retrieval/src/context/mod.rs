//! Context assembly: one search per targeted class, capped per class.

use tracing::{debug, warn};
use wayfinder_core::config::RetrievalConfig;
use wayfinder_core::entity::{ClassDimensions, EntityClass};
use wayfinder_core::models::{IntentTarget, RetrievalContext};
use wayfinder_embeddings::normalize::fit_dimensions;

use crate::search::{SearchEngine, SearchOutcome};

/// Per-class result caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub organizations: usize,
    pub programs: usize,
}

impl ContextLimits {
    pub fn for_class(&self, class: EntityClass) -> usize {
        match class {
            EntityClass::Organization => self.organizations,
            EntityClass::Program => self.programs,
        }
    }
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self::from(&RetrievalConfig::default())
    }
}

impl From<&RetrievalConfig> for ContextLimits {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            organizations: config.organization_limit,
            programs: config.program_limit,
        }
    }
}

/// Outcomes per searched class, kept so callers can inspect faults.
#[derive(Debug, Default)]
pub struct AssembledContext {
    pub context: RetrievalContext,
    pub outcomes: Vec<(EntityClass, SearchOutcome)>,
}

impl AssembledContext {
    pub fn used_fallback(&self) -> bool {
        self.outcomes.iter().any(|(_, o)| o.is_fallback())
    }
}

pub struct ContextAssembler<'s, 'a> {
    search: &'s SearchEngine<'a>,
    dimensions: ClassDimensions,
}

impl<'s, 'a> ContextAssembler<'s, 'a> {
    pub fn new(search: &'s SearchEngine<'a>, dimensions: ClassDimensions) -> Self {
        Self { search, dimensions }
    }

    /// Search every class `target` includes. The query vector is fitted to
    /// each class's dimensionality; a vector that cannot be fitted sends that
    /// class down the lexical path.
    pub fn assemble(
        &self,
        target: IntentTarget,
        query_vector: Option<&[f32]>,
        query_text: Option<&str>,
        limits: ContextLimits,
    ) -> AssembledContext {
        let mut assembled = AssembledContext::default();
        for class in EntityClass::ALL {
            if !target.includes(class) {
                continue;
            }
            let vector = query_vector.and_then(|v| {
                fit_dimensions(v.to_vec(), self.dimensions.for_class(class))
                    .map_err(|e| warn!(class = %class, error = %e, "query vector rejected"))
                    .ok()
            });
            let outcome = self
                .search
                .search(class, vector.as_deref(), query_text, limits.for_class(class));
            debug!(
                class = %class,
                results = outcome.results().len(),
                fallback = outcome.is_fallback(),
                "class searched"
            );
            assembled
                .context
                .set_results(class, outcome.results().to_vec());
            assembled.outcomes.push((class, outcome));
        }
        assembled
    }
}
