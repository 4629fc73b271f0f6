use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::EntityClass;
use crate::errors::{RetrievalError, WayfinderError};

/// Which entity classes a query should be answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTarget {
    Organization,
    Program,
    Both,
    None,
}

impl IntentTarget {
    pub fn includes(&self, class: EntityClass) -> bool {
        match self {
            IntentTarget::Both => true,
            IntentTarget::None => false,
            IntentTarget::Organization => class == EntityClass::Organization,
            IntentTarget::Program => class == EntityClass::Program,
        }
    }

    /// Map a free-form label onto a target. Unrecognized labels yield `None`.
    pub fn from_label(label: &str) -> Option<IntentTarget> {
        match label.trim().to_ascii_lowercase().as_str() {
            "organization" | "organizations" | "university" | "universities" => {
                Some(IntentTarget::Organization)
            }
            "program" | "programs" | "course" | "courses" => Some(IntentTarget::Program),
            "both" | "all" => Some(IntentTarget::Both),
            "none" => Some(IntentTarget::None),
            _ => None,
        }
    }
}

impl fmt::Display for IntentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntentTarget::Organization => "organization",
            IntentTarget::Program => "program",
            IntentTarget::Both => "both",
            IntentTarget::None => "none",
        };
        f.write_str(s)
    }
}

/// Routed decision for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub requires_lookup: bool,
    pub target: IntentTarget,
    pub reason: String,
}

impl QueryIntent {
    /// The safe default: answer without retrieval.
    pub fn no_lookup(reason: impl Into<String>) -> Self {
        Self {
            requires_lookup: false,
            target: IntentTarget::None,
            reason: reason.into(),
        }
    }
}

/// Classifier verdict before normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIntent {
    pub requires_lookup: bool,
    pub target: String,
    pub reason: String,
}

/// Which classes an exposed search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    All,
    Organizations,
    Programs,
}

impl FromStr for SearchScope {
    type Err = WayfinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "both" => Ok(SearchScope::All),
            "organizations" | "universities" => Ok(SearchScope::Organizations),
            "programs" | "courses" => Ok(SearchScope::Programs),
            other => Err(RetrievalError::InvalidRequest {
                reason: format!("unknown search scope '{other}'"),
            }
            .into()),
        }
    }
}
