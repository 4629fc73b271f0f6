use wayfinder_core::entity::{EntityClass, EntityId};
use wayfinder_core::errors::*;

#[test]
fn entity_not_found_carries_class_and_id() {
    let err = WayfinderError::EntityNotFound {
        class: EntityClass::Program,
        id: EntityId(42),
    };
    let msg = err.to_string();
    assert!(msg.contains("program"));
    assert!(msg.contains("42"));
}

#[test]
fn dimension_mismatch_carries_values() {
    let err = EmbeddingError::DimensionMismatch {
        expected: 768,
        actual: 512,
    };
    let msg = err.to_string();
    assert!(msg.contains("768"));
    assert!(msg.contains("512"));
}

#[test]
fn index_unavailable_names_class() {
    let err = IndexError::unavailable(EntityClass::Organization, "never built");
    let msg = err.to_string();
    assert!(msg.contains("organization"));
    assert!(msg.contains("never built"));
}

// --- From impls ---

#[test]
fn storage_error_converts_to_wayfinder_error() {
    let err: WayfinderError = StorageError::SqliteError {
        message: "disk full".into(),
    }
    .into();
    assert!(matches!(err, WayfinderError::StorageError(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn index_error_converts_and_is_flagged() {
    let err: WayfinderError = IndexError::unavailable(EntityClass::Program, "invalidated").into();
    assert!(err.is_index_fault());
}

#[test]
fn retrieval_error_converts_to_wayfinder_error() {
    let err: WayfinderError = RetrievalError::EmbeddingFailed {
        reason: "timeout".into(),
    }
    .into();
    assert!(matches!(
        err,
        WayfinderError::RetrievalError(RetrievalError::EmbeddingFailed { .. })
    ));
    assert!(!err.is_index_fault());
}

#[test]
fn serde_json_error_converts() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: WayfinderError = parse_err.into();
    assert!(matches!(err, WayfinderError::SerializationError(_)));
}
