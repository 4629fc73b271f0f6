use serde::{Deserialize, Serialize};

use super::SearchResult;
use crate::entity::EntityClass;

/// Results handed to the response generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalContext {
    pub organizations: Vec<SearchResult>,
    pub programs: Vec<SearchResult>,
}

impl RetrievalContext {
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty() && self.programs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.organizations.len() + self.programs.len()
    }

    pub fn results_for(&self, class: EntityClass) -> &[SearchResult] {
        match class {
            EntityClass::Organization => &self.organizations,
            EntityClass::Program => &self.programs,
        }
    }

    pub fn set_results(&mut self, class: EntityClass, results: Vec<SearchResult>) {
        match class {
            EntityClass::Organization => self.organizations = results,
            EntityClass::Program => self.programs = results,
        }
    }
}
