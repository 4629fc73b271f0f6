//! Fallback chain for embedding generation.
//!
//! Providers are tried in priority order. Each time a lower-priority
//! provider answers, a `DegradationEvent` is recorded. Events are kept
//! behind a mutex so the chain is usable through `&self`.

use std::sync::Mutex;

use tracing::warn;
use wayfinder_core::errors::{EmbeddingError, WayfinderResult};
use wayfinder_core::models::{DegradationEvent, EmbeddingMode};
use wayfinder_core::traits::IEmbeddingProvider;

#[derive(Default)]
pub struct DegradationChain {
    chain: Vec<Box<dyn IEmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl DegradationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Box<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    /// Embed one text. Returns the vector and the name of the provider used.
    pub fn embed(&self, text: &str, mode: EmbeddingMode) -> WayfinderResult<(Vec<f32>, &str)> {
        self.run(|p| p.embed(text, mode), "embed")
    }

    pub fn embed_batch(
        &self,
        texts: &[String],
        mode: EmbeddingMode,
    ) -> WayfinderResult<(Vec<Vec<f32>>, &str)> {
        self.run(|p| p.embed_batch(texts, mode), "batch embed")
    }

    fn run<T>(
        &self,
        call: impl Fn(&dyn IEmbeddingProvider) -> WayfinderResult<T>,
        op: &str,
    ) -> WayfinderResult<(T, &str)> {
        let mut last_error = None;

        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                last_error.get_or_insert_with(|| {
                    EmbeddingError::ProviderUnavailable {
                        provider: provider.name().to_string(),
                    }
                    .into()
                });
                continue;
            }
            match call(provider.as_ref()) {
                Ok(value) => {
                    if i > 0 {
                        self.record_fallback(provider.name());
                    }
                    return Ok((value, provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "{op} failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: "all providers exhausted".to_string(),
            }
            .into()
        }))
    }

    fn record_fallback(&self, fallback: &str) {
        let primary = self.chain.first().map(|p| p.name()).unwrap_or("unknown");
        if let Ok(mut events) = self.events.lock() {
            events.push(DegradationEvent::now(
                "embeddings",
                format!("{primary} unavailable"),
                fallback,
            ));
        }
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;
    impl IEmbeddingProvider for FailingProvider {
        fn embed(&self, _text: &str, _mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
            Err(EmbeddingError::InferenceFailed {
                reason: "mock failure".to_string(),
            }
            .into())
        }
        fn dimensions(&self) -> usize {
            4
        }
        fn name(&self) -> &str {
            "failing-mock"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    struct FixedProvider {
        name: &'static str,
        available: bool,
    }
    impl IEmbeddingProvider for FixedProvider {
        fn embed(&self, _text: &str, _mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
            Ok(vec![1.0; 4])
        }
        fn dimensions(&self) -> usize {
            4
        }
        fn name(&self) -> &str {
            self.name
        }
        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn fixed(name: &'static str) -> Box<dyn IEmbeddingProvider> {
        Box::new(FixedProvider { name, available: true })
    }

    #[test]
    fn primary_success_records_nothing() {
        let mut chain = DegradationChain::new();
        chain.push(fixed("primary"));
        chain.push(fixed("fallback"));

        let (_, name) = chain.embed("q", EmbeddingMode::Query).unwrap();
        assert_eq!(name, "primary");
        assert!(chain.drain_events().is_empty());
    }

    #[test]
    fn fallback_records_event() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(fixed("fallback"));

        let (vec, name) = chain.embed("q", EmbeddingMode::Query).unwrap();
        assert_eq!(name, "fallback");
        assert_eq!(vec.len(), 4);

        let events = chain.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].component, "embeddings");
        assert_eq!(events[0].failure, "failing-mock unavailable");
        assert_eq!(events[0].fallback_used, "fallback");
        assert!(chain.drain_events().is_empty());
    }

    #[test]
    fn unavailable_providers_are_skipped() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FixedProvider {
            name: "down",
            available: false,
        }));
        chain.push(fixed("up"));
        assert_eq!(chain.active_provider_name(), "up");
    }

    #[test]
    fn all_failing_is_an_error() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        assert!(chain.embed("q", EmbeddingMode::Document).is_err());

        let empty = DegradationChain::new();
        assert!(empty.embed("q", EmbeddingMode::Document).is_err());
        assert_eq!(empty.active_provider_name(), "none");
    }

    #[test]
    fn exhausted_chain_names_the_unavailable_provider() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FixedProvider {
            name: "remote (KEY not set)",
            available: false,
        }));
        let err = chain.embed("q", EmbeddingMode::Query).unwrap_err();
        assert!(err.to_string().contains("remote (KEY not set)"));
        assert_eq!(chain.active_provider_name(), "none");
    }

    #[test]
    fn batch_uses_fallback() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(fixed("batch-fallback"));

        let texts = vec!["a".to_string(), "b".to_string()];
        let (vecs, name) = chain.embed_batch(&texts, EmbeddingMode::Document).unwrap();
        assert_eq!(name, "batch-fallback");
        assert_eq!(vecs.len(), 2);
    }
}
