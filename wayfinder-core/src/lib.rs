//! # wayfinder-core
//!
//! Foundation crate for the Wayfinder retrieval system.
//! Defines the entity model, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod entity;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::WayfinderConfig;
pub use entity::{
    ClassDimensions, Entity, EntityClass, EntityId, EntityRecord, Organization, Program,
};
pub use errors::{WayfinderError, WayfinderResult};
pub use models::{IntentTarget, QueryIntent, RetrievalContext, SearchResult, SearchScope};
