//! EmbeddingEngine: the main entry point for wayfinder-embeddings.
//!
//! Coordinates the provider chain, the L1 cache and per-class dimension
//! fitting. Implements `IEmbeddingProvider`, fitting to the shared
//! configured dimensionality.

use tracing::{debug, info};
use wayfinder_core::config::EmbeddingConfig;
use wayfinder_core::entity::{ClassDimensions, EntityClass};
use wayfinder_core::errors::{EmbeddingError, WayfinderResult};
use wayfinder_core::models::{DegradationEvent, EmbeddingMode};
use wayfinder_core::traits::IEmbeddingProvider;
use wayfinder_observability::embedding_span;

use crate::cache::{cache_key, L1MemoryCache};
use crate::degradation::DegradationChain;
use crate::normalize::fit_dimensions;
use crate::providers;

pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: L1MemoryCache,
    config: EmbeddingConfig,
    dimensions: ClassDimensions,
}

impl EmbeddingEngine {
    /// Build the chain from configuration: the primary provider, then the
    /// fallback provider when one is configured.
    pub fn new(config: EmbeddingConfig) -> Self {
        let mut chain = DegradationChain::new();
        chain.push(providers::create_provider(&config));
        if let Some(fallback) = config.fallback_provider.as_deref() {
            if fallback != config.provider {
                chain.push(providers::create_named_provider(fallback, &config));
            }
        }
        Self::with_chain(config, chain)
    }

    /// Use an explicit provider chain.
    pub fn with_chain(config: EmbeddingConfig, chain: DegradationChain) -> Self {
        let cache = L1MemoryCache::new(config.l1_cache_size);
        let dimensions = config.class_dimensions();

        info!(
            provider = chain.active_provider_name(),
            providers = chain.len(),
            organization_dims = dimensions.organization,
            program_dims = dimensions.program,
            "EmbeddingEngine initialized"
        );

        Self {
            chain,
            cache,
            config,
            dimensions,
        }
    }

    /// Raw provider output for `text`, served from cache when possible.
    ///
    /// Lookups use the currently active provider and inserts use the one that
    /// answered, so a fallback vector is never served once the primary is
    /// answering again.
    pub fn embed_raw(&self, text: &str, mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
        let active = self.chain.active_provider_name();
        if let Some(vec) = self.cache.get(&cache_key(active, mode, text)) {
            debug!(provider = active, mode = mode.task_type(), "embedding cache hit");
            return Ok(vec);
        }

        let span = embedding_span!(active, self.config.dimensions);
        let _guard = span.enter();
        let (embedding, provider) = self.chain.embed(text, mode)?;
        if embedding.is_empty() {
            return Err(EmbeddingError::InvalidVector {
                reason: format!("{provider} returned an empty vector"),
            }
            .into());
        }
        self.cache.insert(cache_key(provider, mode, text), &embedding);
        Ok(embedding)
    }

    /// Embed and fit to the dimensionality configured for `class`.
    pub fn embed_for_class(
        &self,
        text: &str,
        mode: EmbeddingMode,
        class: EntityClass,
    ) -> WayfinderResult<Vec<f32>> {
        let raw = self.embed_raw(text, mode)?;
        fit_dimensions(raw, self.dimensions.for_class(class))
    }

    /// Batch embedding with cache lookups. Only cache misses reach the chain.
    pub fn embed_batch_raw(
        &self,
        texts: &[String],
        mode: EmbeddingMode,
    ) -> WayfinderResult<Vec<Vec<f32>>> {
        let active = self.chain.active_provider_name();
        let mut out: Vec<Option<Vec<f32>>> = texts
            .iter()
            .map(|t| self.cache.get(&cache_key(active, mode, t)))
            .collect();

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        if !missing.is_empty() {
            let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let (vectors, provider) = self.chain.embed_batch(&batch, mode)?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!(
                        "{provider} returned {} vectors for {} texts",
                        vectors.len(),
                        batch.len()
                    ),
                }
                .into());
            }
            for (i, vec) in missing.into_iter().zip(vectors) {
                if !vec.is_empty() {
                    self.cache.insert(cache_key(provider, mode, &texts[i]), &vec);
                }
                out[i] = Some(vec);
            }
        }

        Ok(out.into_iter().flatten().collect())
    }

    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn class_dimensions(&self) -> ClassDimensions {
        self.dimensions
    }

    pub fn cache(&self) -> &L1MemoryCache {
        &self.cache
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str, mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
        fit_dimensions(self.embed_raw(text, mode)?, self.config.dimensions)
    }

    fn embed_batch(&self, texts: &[String], mode: EmbeddingMode) -> WayfinderResult<Vec<Vec<f32>>> {
        self.embed_batch_raw(texts, mode)?
            .into_iter()
            .map(|v| fit_dimensions(v, self.config.dimensions))
            .collect()
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        self.chain.active_provider_name()
    }

    fn is_available(&self) -> bool {
        self.chain.active_provider_name() != "none"
    }
}
