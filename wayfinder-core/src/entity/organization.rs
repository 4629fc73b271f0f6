use serde::{Deserialize, Serialize};

/// An organization (university) that offers programs.
///
/// Upsert identity is the natural key `(name, country)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub undergraduate_programs: Option<String>,
    pub graduate_programs: Option<String>,
    pub tuition_undergrad: Option<String>,
    pub tuition_grad: Option<String>,
    pub living_cost: Option<String>,
    pub application_deadlines: Option<String>,
    pub admission_requirements: Option<String>,
    pub scholarships: Option<String>,
    pub campus_facilities: Option<String>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
