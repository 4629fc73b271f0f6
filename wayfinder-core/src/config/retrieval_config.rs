use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::LEXICAL_FALLBACK_SCORE;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Result cap for the exposed search when the caller gives none.
    pub default_limit: usize,
    /// Organizations included in a chat context.
    pub organization_limit: usize,
    /// Programs included in a chat context.
    pub program_limit: usize,
    /// Rebuild every class index when the engine opens.
    pub rebuild_on_open: bool,
}

impl RetrievalConfig {
    /// Score of lexical matches. Fixed; not configurable.
    pub fn lexical_fallback_score(&self) -> f64 {
        LEXICAL_FALLBACK_SCORE
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::DEFAULT_SEARCH_LIMIT,
            organization_limit: defaults::DEFAULT_ORGANIZATION_LIMIT,
            program_limit: defaults::DEFAULT_PROGRAM_LIMIT,
            rebuild_on_open: defaults::DEFAULT_REBUILD_ON_OPEN,
        }
    }
}
