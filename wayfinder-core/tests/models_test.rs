use wayfinder_core::entity::*;
use wayfinder_core::models::*;

#[test]
fn intent_target_labels_map_synonyms() {
    assert_eq!(IntentTarget::from_label("University"), Some(IntentTarget::Organization));
    assert_eq!(IntentTarget::from_label(" courses "), Some(IntentTarget::Program));
    assert_eq!(IntentTarget::from_label("ALL"), Some(IntentTarget::Both));
    assert_eq!(IntentTarget::from_label("weather"), None);
}

#[test]
fn intent_target_includes_classes() {
    assert!(IntentTarget::Both.includes(EntityClass::Organization));
    assert!(IntentTarget::Both.includes(EntityClass::Program));
    assert!(!IntentTarget::None.includes(EntityClass::Program));
    assert!(!IntentTarget::Organization.includes(EntityClass::Program));
}

#[test]
fn search_scope_parses_domain_words() {
    assert_eq!("universities".parse::<SearchScope>().unwrap(), SearchScope::Organizations);
    assert_eq!("Courses".parse::<SearchScope>().unwrap(), SearchScope::Programs);
    assert_eq!("all".parse::<SearchScope>().unwrap(), SearchScope::All);
    assert!("planets".parse::<SearchScope>().is_err());
}

#[test]
fn raw_intent_tolerates_missing_fields() {
    let raw: RawIntent = serde_json::from_str(r#"{"requires_lookup": true}"#).unwrap();
    assert!(raw.requires_lookup);
    assert!(raw.target.is_empty());
}

#[test]
fn embedding_mode_task_types() {
    assert_eq!(EmbeddingMode::Document.task_type(), "RETRIEVAL_DOCUMENT");
    assert_eq!(EmbeddingMode::Query.task_type(), "RETRIEVAL_QUERY");
}

#[test]
fn retrieval_context_reports_emptiness() {
    let mut ctx = RetrievalContext::default();
    assert!(ctx.is_empty());
    ctx.set_results(
        EntityClass::Program,
        vec![SearchResult {
            entity: Entity {
                id: EntityId(1),
                record: Program::new(EntityId(9), "Data Science").into(),
            },
            organization_name: Some("Example University".into()),
            similarity_score: 0.9,
            match_source: MatchSource::Vector,
        }],
    );
    assert!(!ctx.is_empty());
    assert_eq!(ctx.len(), 1);
    assert!(ctx.results_for(EntityClass::Organization).is_empty());
}

#[test]
fn embedding_text_for_program_includes_organization() {
    let record: EntityRecord = Program::new(EntityId(1), "Robotics")
        .with_field("Engineering")
        .with_degree("MSc")
        .into();
    let text = record.embedding_text(Some("Tech University"));
    assert!(text.starts_with("Course: Robotics\n"));
    assert!(text.contains("University: Tech University"));
    assert!(text.contains("Degree Type: MSc"));
}

#[test]
fn embedding_text_for_organization() {
    let record: EntityRecord = Organization::new("Example University")
        .with_country("Norway")
        .with_description("Coastal campus")
        .into();
    assert_eq!(
        record.embedding_text(None),
        "University: Example University\nCountry: Norway\nDescription: Coastal campus"
    );
}

#[test]
fn blank_name_is_invalid() {
    let record: EntityRecord = Organization::new("   ").into();
    assert!(record.validate().is_err());
}

#[test]
fn entity_record_serde_is_tagged_by_class() {
    let record: EntityRecord = Organization::new("A").into();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["class"], "organization");
    let back: EntityRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn target_labels_ignore_case_and_padding(
            label in prop::sample::select(vec![
                "organization", "university", "program", "course", "both", "all",
            ]),
            upper in any::<bool>(),
            pad in 0usize..3,
        ) {
            let spaced = format!("{}{}{}", " ".repeat(pad), label, " ".repeat(pad));
            let input = if upper { spaced.to_uppercase() } else { spaced };
            prop_assert_eq!(IntentTarget::from_label(&input), IntentTarget::from_label(label));
            prop_assert!(IntentTarget::from_label(&input).is_some());
        }
    }
}
