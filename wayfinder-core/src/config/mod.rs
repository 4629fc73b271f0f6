pub mod defaults;
mod embedding_config;
mod observability_config;
mod retrieval_config;
mod storage_config;

pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::ClassDimensions;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Every section falls back to its compiled defaults, so an empty document
/// is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WayfinderConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub observability: ObservabilityConfig,
}

impl WayfinderConfig {
    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: WayfinderConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseFailed {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, then apply `WAYFINDER_*` environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("WAYFINDER_DB_PATH") {
            self.storage.db_path = path;
        }
        if let Ok(provider) = std::env::var("WAYFINDER_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider;
        }
        if let Ok(level) = std::env::var("WAYFINDER_LOG_LEVEL") {
            self.observability.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = self.class_dimensions();
        if dims.organization == 0 || dims.program == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dimensions".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.storage.read_pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.read_pool_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.retrieval.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.default_limit".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.embedding.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.batch_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Per-class dimensionality after applying overrides.
    pub fn class_dimensions(&self) -> ClassDimensions {
        self.embedding.class_dimensions()
    }
}
