//! Entity types: organizations and the programs they offer.

mod class;
mod organization;
mod program;
mod record;

pub use class::{ClassDimensions, EntityClass};
pub use organization::Organization;
pub use program::Program;
pub use record::{Entity, EntityId, EntityRecord};
