use serde::{Deserialize, Serialize};

use super::defaults;
use crate::entity::ClassDimensions;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "remote" or "hashed".
    pub provider: String,
    /// Provider tried when the primary fails.
    pub fallback_provider: Option<String>,
    /// Remote model name.
    pub model: String,
    /// Remote API base URL.
    pub endpoint: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Embedding dimensions shared by all classes unless overridden.
    pub dimensions: usize,
    pub organization_dimensions: Option<usize>,
    pub program_dimensions: Option<usize>,
    /// Batch size for backfill.
    pub batch_size: usize,
    /// L1 in-memory cache max entries.
    pub l1_cache_size: u64,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
}

impl EmbeddingConfig {
    pub fn class_dimensions(&self) -> ClassDimensions {
        ClassDimensions {
            organization: self.organization_dimensions.unwrap_or(self.dimensions),
            program: self.program_dimensions.unwrap_or(self.dimensions),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            fallback_provider: None,
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            endpoint: defaults::DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            organization_dimensions: None,
            program_dimensions: None,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
        }
    }
}
