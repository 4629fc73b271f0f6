use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, WayfinderError};

/// The two searchable entity classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    Organization,
    Program,
}

impl EntityClass {
    pub const ALL: [EntityClass; 2] = [EntityClass::Organization, EntityClass::Program];

    /// Stable tag stored in the `entity_class` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityClass::Organization => "organization",
            EntityClass::Program => "program",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityClass {
    type Err = WayfinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organization" | "university" => Ok(EntityClass::Organization),
            "program" | "course" => Ok(EntityClass::Program),
            other => Err(ConfigError::InvalidValue {
                field: "entity_class".to_string(),
                reason: format!("unknown entity class '{other}'"),
            }
            .into()),
        }
    }
}

/// Embedding dimensionality per entity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDimensions {
    pub organization: usize,
    pub program: usize,
}

impl ClassDimensions {
    /// Same dimensionality for every class.
    pub fn uniform(dimensions: usize) -> Self {
        Self {
            organization: dimensions,
            program: dimensions,
        }
    }

    pub fn for_class(&self, class: EntityClass) -> usize {
        match class {
            EntityClass::Organization => self.organization,
            EntityClass::Program => self.program,
        }
    }
}
