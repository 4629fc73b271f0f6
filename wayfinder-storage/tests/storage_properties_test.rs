//! Property tests: put/get_all consistency.

use proptest::prelude::*;

use wayfinder_core::entity::*;
use wayfinder_core::traits::IEmbeddingStore;
use wayfinder_storage::StorageEngine;

const DIMS: usize = 4;

fn vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1000.0f32..1000.0, DIMS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_last_put_wins(
        writes in prop::collection::vec((1i64..20, vector()), 1..40)
    ) {
        let engine = StorageEngine::open_in_memory(ClassDimensions::uniform(DIMS)).unwrap();
        let mut expected = std::collections::BTreeMap::new();
        for (id, v) in &writes {
            engine.put(EntityId(*id), EntityClass::Organization, v).unwrap();
            expected.insert(*id, v.clone());
        }

        let scanned: Vec<(i64, Vec<f32>)> = engine
            .get_all(EntityClass::Organization)
            .map(|r| r.map(|s| (s.entity_id.get(), s.vector)).unwrap())
            .collect();
        let expected: Vec<(i64, Vec<f32>)> = expected.into_iter().collect();
        prop_assert_eq!(scanned, expected);
    }

    #[test]
    fn prop_wrong_length_leaves_store_unchanged(
        initial in vector(),
        bad_len in (0usize..10).prop_filter("must differ", |n| *n != DIMS)
    ) {
        let engine = StorageEngine::open_in_memory(ClassDimensions::uniform(DIMS)).unwrap();
        engine.put(EntityId(1), EntityClass::Program, &initial).unwrap();
        let bad = vec![0.5f32; bad_len];
        prop_assert!(engine.put(EntityId(1), EntityClass::Program, &bad).is_err());

        let stored: Vec<_> = engine
            .get_all(EntityClass::Program)
            .map(|r| r.unwrap().vector)
            .collect();
        prop_assert_eq!(stored, vec![initial]);
    }
}
