use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EntityClass, Organization, Program};
use crate::errors::{WayfinderError, WayfinderResult};

/// Stable integer identity, assigned on first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId(value)
    }
}

/// Field data of one entity, tagged by class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum EntityRecord {
    Organization(Organization),
    Program(Program),
}

impl EntityRecord {
    pub fn class(&self) -> EntityClass {
        match self {
            EntityRecord::Organization(_) => EntityClass::Organization,
            EntityRecord::Program(_) => EntityClass::Program,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityRecord::Organization(o) => &o.name,
            EntityRecord::Program(p) => &p.name,
        }
    }

    /// Reject records that cannot be stored.
    pub fn validate(&self) -> WayfinderResult<()> {
        if self.name().trim().is_empty() {
            return Err(WayfinderError::InvalidEntity {
                class: self.class(),
                reason: "name must not be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Document text fed to the embedding model.
    ///
    /// Programs include the owning organization's name when the caller has it.
    pub fn embedding_text(&self, organization_name: Option<&str>) -> String {
        match self {
            EntityRecord::Organization(o) => format!(
                "University: {}\nCountry: {}\nDescription: {}",
                o.name,
                o.country.as_deref().unwrap_or_default(),
                o.description.as_deref().unwrap_or_default(),
            ),
            EntityRecord::Program(p) => format!(
                "Course: {}\nUniversity: {}\nField of Study: {}\nDegree Type: {}\nDescription: {}",
                p.name,
                organization_name.unwrap_or_default(),
                p.field_of_study.as_deref().unwrap_or_default(),
                p.degree_type.as_deref().unwrap_or_default(),
                p.description.as_deref().unwrap_or_default(),
            ),
        }
    }

    pub fn as_organization(&self) -> Option<&Organization> {
        match self {
            EntityRecord::Organization(o) => Some(o),
            EntityRecord::Program(_) => None,
        }
    }

    pub fn as_program(&self) -> Option<&Program> {
        match self {
            EntityRecord::Program(p) => Some(p),
            EntityRecord::Organization(_) => None,
        }
    }
}

impl From<Organization> for EntityRecord {
    fn from(value: Organization) -> Self {
        EntityRecord::Organization(value)
    }
}

impl From<Program> for EntityRecord {
    fn from(value: Program) -> Self {
        EntityRecord::Program(value)
    }
}

/// A stored entity: identity plus fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub record: EntityRecord,
}

impl Entity {
    pub fn class(&self) -> EntityClass {
        self.record.class()
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }
}
