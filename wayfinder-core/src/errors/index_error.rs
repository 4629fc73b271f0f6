use crate::entity::{EntityClass, EntityId};

/// Vector index errors.
///
/// `IndexUnavailable` is never surfaced to the end user; it routes a search
/// onto the lexical fallback path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    #[error("vector index unavailable for {class}: {reason}")]
    IndexUnavailable { class: EntityClass, reason: String },

    #[error("stale index entry: {class} {id} no longer exists")]
    StaleIndexEntry { class: EntityClass, id: EntityId },
}

impl IndexError {
    pub fn unavailable(class: EntityClass, reason: impl Into<String>) -> Self {
        IndexError::IndexUnavailable {
            class,
            reason: reason.into(),
        }
    }
}
