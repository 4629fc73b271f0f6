use test_fixtures::*;
use wayfinder_core::entity::{ClassDimensions, EntityClass};
use wayfinder_core::traits::IEntityRepository;
use wayfinder_storage::StorageEngine;

#[test]
fn catalog_fixture_exists_and_parses() {
    assert!(fixture_exists("catalog.json"));
    let catalog = load_catalog();
    assert_eq!(catalog.organizations.len(), 3);
    assert!(catalog.organizations.iter().all(|o| !o.programs.is_empty()));
    assert_eq!(catalog.organizations[0].organization.country.as_deref(), Some("Canada"));
}

#[test]
fn seeding_assigns_ids_in_catalog_order() {
    let engine = StorageEngine::open_in_memory(ClassDimensions::uniform(4)).unwrap();
    let catalog = load_catalog();
    let ids = seed_catalog(&engine, &catalog).unwrap();
    assert_eq!(ids.organizations.len(), 3);
    assert_eq!(ids.programs.len(), 4);
    assert!(ids.organizations.windows(2).all(|w| w[0] < w[1]));

    let first_program = engine
        .get_by_id(EntityClass::Program, ids.programs[0])
        .unwrap()
        .unwrap();
    assert_eq!(first_program.name(), "MSc Data Science");
    assert_eq!(
        first_program.record.as_program().unwrap().organization_id,
        ids.organizations[0]
    );
}

#[test]
fn seeding_twice_is_idempotent() {
    let engine = StorageEngine::open_in_memory(ClassDimensions::uniform(4)).unwrap();
    let catalog = load_catalog();
    let first = seed_catalog(&engine, &catalog).unwrap();
    let second = seed_catalog(&engine, &catalog).unwrap();
    assert_eq!(first.organizations, second.organizations);
    assert_eq!(first.programs, second.programs);
    assert_eq!(engine.count_entities(EntityClass::Program).unwrap(), 4);
}

#[test]
fn axis_vector_is_unit() {
    assert_eq!(axis_vector(3, 1), vec![0.0, 1.0, 0.0]);
    assert_eq!(axis_vector(2, 5), vec![0.0, 0.0]);
}
