//! Provider registry.
//!
//! `remote` talks to an embedContent-style HTTP API; `hashed` is the offline
//! TF-IDF provider and is only built when named. A provider that cannot be
//! built stays in the chain as unavailable, so its failure reaches the caller.

pub mod hashed_tfidf;
pub mod remote_provider;
pub mod unavailable;

pub use hashed_tfidf::HashedTfIdfProvider;
pub use remote_provider::RemoteEmbeddingProvider;
pub use unavailable::UnavailableProvider;

use tracing::{info, warn};
use wayfinder_core::config::EmbeddingConfig;
use wayfinder_core::errors::{EmbeddingError, WayfinderError};
use wayfinder_core::traits::IEmbeddingProvider;

/// Build the provider named `name`, returning it boxed.
pub fn create_named_provider(name: &str, config: &EmbeddingConfig) -> Box<dyn IEmbeddingProvider> {
    match name {
        "remote" => match RemoteEmbeddingProvider::from_config(config) {
            Ok(p) => {
                info!(provider = "remote", model = %config.model, "embedding provider ready");
                Box::new(p)
            }
            Err(e) => {
                warn!(error = %e, "remote embedding provider could not be built");
                Box::new(UnavailableProvider::new(unavailable_label(e), config.dimensions))
            }
        },
        "hashed" | "tfidf" => {
            info!(provider = "hashed", "using hashed TF-IDF embedding provider");
            Box::new(HashedTfIdfProvider::new(config.dimensions))
        }
        other => {
            warn!(provider = other, "unknown embedding provider");
            Box::new(UnavailableProvider::new(
                format!("{other} (unknown provider)"),
                config.dimensions,
            ))
        }
    }
}

fn unavailable_label(error: WayfinderError) -> String {
    match error {
        WayfinderError::EmbeddingError(EmbeddingError::ProviderUnavailable { provider }) => {
            provider
        }
        other => format!("remote ({other})"),
    }
}

/// Build the configured primary provider.
pub fn create_provider(config: &EmbeddingConfig) -> Box<dyn IEmbeddingProvider> {
    create_named_provider(&config.provider, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::models::EmbeddingMode;

    #[test]
    fn hashed_provider_by_name() {
        let config = EmbeddingConfig {
            provider: "hashed".to_string(),
            dimensions: 32,
            ..Default::default()
        };
        let p = create_provider(&config);
        assert_eq!(p.name(), "hashed-tfidf");
        assert_eq!(p.dimensions(), 32);
    }

    #[test]
    fn remote_without_key_is_unavailable() {
        let config = EmbeddingConfig {
            provider: "remote".to_string(),
            api_key_env: "WAYFINDER_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            dimensions: 16,
            ..Default::default()
        };
        let p = create_provider(&config);
        assert!(!p.is_available());
        assert!(p.name().contains("WAYFINDER_TEST_KEY_THAT_IS_NOT_SET"));
        assert!(p.embed("masters in canada", EmbeddingMode::Query).is_err());
    }

    #[test]
    fn unknown_name_is_unavailable() {
        let p = create_named_provider("word2vec", &EmbeddingConfig::default());
        assert!(!p.is_available());
    }
}
