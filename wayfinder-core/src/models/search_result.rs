use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Vector,
    Lexical,
}

/// An entity projection with a similarity score in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub entity: Entity,
    /// Owning organization's name, set for programs.
    pub organization_name: Option<String>,
    pub similarity_score: f64,
    pub match_source: MatchSource,
}
