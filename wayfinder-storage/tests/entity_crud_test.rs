//! Integration test: organization/program lifecycle through the repository.

use wayfinder_core::entity::*;
use wayfinder_core::errors::WayfinderError;
use wayfinder_core::traits::{IEmbeddingStore, IEntityRepository};
use wayfinder_storage::StorageEngine;

fn engine() -> StorageEngine {
    StorageEngine::open_in_memory(ClassDimensions::uniform(2)).unwrap()
}

#[test]
fn upsert_and_get_organization() {
    let engine = engine();
    let org = Organization::new("Example University")
        .with_country("Norway")
        .with_description("Fjord campus");
    let id = engine.upsert(&org.clone().into()).unwrap();

    let stored = engine.get_by_id(EntityClass::Organization, id).unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.record, EntityRecord::Organization(org));
}

#[test]
fn upsert_by_natural_key_keeps_id() {
    let engine = engine();
    let first = engine
        .upsert(&Organization::new("Example University").with_country("Norway").into())
        .unwrap();
    let second = engine
        .upsert(
            &Organization::new("Example University")
                .with_country("Norway")
                .with_description("updated")
                .into(),
        )
        .unwrap();
    assert_eq!(first, second);

    // Same name, different country is a different organization.
    let other = engine
        .upsert(&Organization::new("Example University").with_country("Chile").into())
        .unwrap();
    assert_ne!(first, other);

    let stored = engine.get_by_id(EntityClass::Organization, first).unwrap().unwrap();
    assert_eq!(stored.record.as_organization().unwrap().description.as_deref(), Some("updated"));
}

#[test]
fn upsert_without_country_matches_null_country() {
    let engine = engine();
    let a = engine.upsert(&Organization::new("Stateless College").into()).unwrap();
    let b = engine.upsert(&Organization::new("Stateless College").into()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn program_requires_existing_organization() {
    let engine = engine();
    let err = engine
        .upsert(&Program::new(EntityId(999), "Orphan Program").into())
        .unwrap_err();
    assert!(matches!(
        err,
        WayfinderError::EntityNotFound {
            class: EntityClass::Organization,
            ..
        }
    ));
    assert!(engine.find_by_text(EntityClass::Program, "orphan", 10).unwrap().is_empty());
}

#[test]
fn blank_name_is_rejected() {
    let engine = engine();
    let err = engine.upsert(&Organization::new("  ").into()).unwrap_err();
    assert!(matches!(err, WayfinderError::InvalidEntity { .. }));
}

#[test]
fn missing_entity_is_none() {
    let engine = engine();
    assert!(engine.get_by_id(EntityClass::Program, EntityId(7)).unwrap().is_none());
}

#[test]
fn update_drops_stored_embedding() {
    let engine = engine();
    let id = engine.upsert(&Organization::new("A").into()).unwrap();
    engine.put(id, EntityClass::Organization, &[1.0, 0.0]).unwrap();
    assert!(engine.list_unembedded(EntityClass::Organization, 10).unwrap().is_empty());

    engine
        .upsert(&Organization::new("A").with_description("changed").into())
        .unwrap();
    assert_eq!(engine.count(EntityClass::Organization).unwrap(), 0);
    let pending = engine.list_unembedded(EntityClass::Organization, 10).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);
}

#[test]
fn delete_organization_cascades_to_programs_and_embeddings() {
    let engine = engine();
    let org = engine.upsert(&Organization::new("Gone University").into()).unwrap();
    let program = engine.upsert(&Program::new(org, "Gone Program").into()).unwrap();
    engine.put(org, EntityClass::Organization, &[1.0, 0.0]).unwrap();
    engine.put(program, EntityClass::Program, &[0.0, 1.0]).unwrap();

    assert!(IEntityRepository::delete(&engine, EntityClass::Organization, org).unwrap());
    assert!(engine.get_by_id(EntityClass::Program, program).unwrap().is_none());
    assert_eq!(engine.count(EntityClass::Organization).unwrap(), 0);
    assert_eq!(engine.count(EntityClass::Program).unwrap(), 0);

    // Second delete is a no-op.
    assert!(!IEntityRepository::delete(&engine, EntityClass::Organization, org).unwrap());
}

#[test]
fn find_by_text_is_case_insensitive_and_ordered_by_id() {
    let engine = engine();
    let a = engine
        .upsert(&Organization::new("Harbor Tech").with_description("Marine ROBOTICS").into())
        .unwrap();
    let _b = engine.upsert(&Organization::new("Hill Arts").into()).unwrap();
    let c = engine
        .upsert(&Organization::new("Robotics Academy").into())
        .unwrap();

    let hits = engine.find_by_text(EntityClass::Organization, "robotics", 10).unwrap();
    let ids: Vec<_> = hits.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![a, c]);

    let limited = engine.find_by_text(EntityClass::Organization, "ROBOTICS", 1).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, a);
}

#[test]
fn find_by_text_folds_non_ascii_capitals() {
    let engine = engine();
    let ecole = engine
        .upsert(&Organization::new("École Polytechnique").into())
        .unwrap();
    engine.upsert(&Organization::new("Ecole Normale").into()).unwrap();

    for needle in ["École", "école", "ÉCOLE POLY"] {
        let hits = engine.find_by_text(EntityClass::Organization, needle, 5).unwrap();
        assert_eq!(hits.iter().map(|e| e.id).collect::<Vec<_>>(), vec![ecole], "{needle}");
    }
}

#[test]
fn find_by_text_treats_wildcards_literally() {
    let engine = engine();
    engine.upsert(&Organization::new("Plain College").into()).unwrap();
    assert!(engine.find_by_text(EntityClass::Organization, "%", 10).unwrap().is_empty());
    assert!(engine.find_by_text(EntityClass::Organization, "_", 10).unwrap().is_empty());
    assert!(engine.find_by_text(EntityClass::Organization, "   ", 10).unwrap().is_empty());
}

#[test]
fn list_unembedded_skips_embedded() {
    let engine = engine();
    let a = engine.upsert(&Organization::new("A").into()).unwrap();
    let b = engine.upsert(&Organization::new("B").into()).unwrap();
    engine.put(a, EntityClass::Organization, &[1.0, 0.0]).unwrap();

    let pending = engine.list_unembedded(EntityClass::Organization, 10).unwrap();
    assert_eq!(pending.iter().map(|e| e.id).collect::<Vec<_>>(), vec![b]);
}

#[test]
fn seeded_catalog_supports_lexical_lookup() {
    let engine = engine();
    let catalog = test_fixtures::load_catalog();
    let ids = test_fixtures::seed_catalog(&engine, &catalog).unwrap();

    let energy = engine.find_by_text(EntityClass::Program, "renewable", 10).unwrap();
    assert_eq!(energy.len(), 1);
    assert_eq!(energy[0].id, ids.programs[2]);

    let canada = engine.find_by_text(EntityClass::Organization, "canada", 10).unwrap();
    assert_eq!(canada.iter().map(|e| e.id).collect::<Vec<_>>(), vec![ids.organizations[0]]);
}
