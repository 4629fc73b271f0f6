//! Placeholder for a configured provider that could not be constructed.
//!
//! It keeps its slot in the chain so the failure surfaces as
//! `ProviderUnavailable` instead of being papered over by a provider from a
//! different vector space.

use wayfinder_core::errors::{EmbeddingError, WayfinderResult};
use wayfinder_core::models::EmbeddingMode;
use wayfinder_core::traits::IEmbeddingProvider;

pub struct UnavailableProvider {
    /// Provider name plus the construction failure, e.g. `remote (KEY not set)`.
    label: String,
    dimensions: usize,
}

impl UnavailableProvider {
    pub fn new(label: impl Into<String>, dimensions: usize) -> Self {
        Self {
            label: label.into(),
            dimensions,
        }
    }
}

impl IEmbeddingProvider for UnavailableProvider {
    fn embed(&self, _text: &str, _mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: self.label.clone(),
        }
        .into())
    }

    fn embed_batch(
        &self,
        _texts: &[String],
        _mode: EmbeddingMode,
    ) -> WayfinderResult<Vec<Vec<f32>>> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: self.label.clone(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn is_available(&self) -> bool {
        false
    }
}
