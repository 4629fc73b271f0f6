use serde::{Deserialize, Serialize};

use super::EntityId;

/// A program (course) offered by exactly one organization.
///
/// Upsert identity is the natural key `(name, organization_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub organization_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub degree_type: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub tuition_fee: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub admission_requirements: Option<String>,
    #[serde(default)]
    pub scholarships: Option<String>,
    #[serde(default)]
    pub language_of_study: Option<String>,
    #[serde(default)]
    pub starting_date: Option<String>,
}

impl Program {
    pub fn new(organization_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            organization_id,
            name: name.into(),
            description: None,
            degree_type: None,
            field_of_study: None,
            duration: None,
            tuition_fee: None,
            application_deadline: None,
            admission_requirements: None,
            scholarships: None,
            language_of_study: None,
            starting_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field_of_study: impl Into<String>) -> Self {
        self.field_of_study = Some(field_of_study.into());
        self
    }

    pub fn with_degree(mut self, degree_type: impl Into<String>) -> Self {
        self.degree_type = Some(degree_type.into());
        self
    }
}
