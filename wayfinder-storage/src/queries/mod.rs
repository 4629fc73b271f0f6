//! SQL query modules. Each function takes a borrowed connection so the
//! engine decides which pool connection runs it.

pub mod embedding_ops;
pub mod entity_crud;
pub mod entity_search;

use wayfinder_core::entity::EntityClass;

/// Table holding rows of `class`.
pub(crate) fn table_for(class: EntityClass) -> &'static str {
    match class {
        EntityClass::Organization => "organizations",
        EntityClass::Program => "programs",
    }
}

pub(crate) const ORGANIZATION_COLUMNS: &str = "id, name, country, city, website, description,
    undergraduate_programs, graduate_programs, tuition_undergrad, tuition_grad, living_cost,
    application_deadlines, admission_requirements, scholarships, campus_facilities";

pub(crate) const PROGRAM_COLUMNS: &str = "id, organization_id, name, description, degree_type,
    field_of_study, duration, tuition_fee, application_deadline, admission_requirements,
    scholarships, language_of_study, starting_date";

/// Columns matched by the lexical fallback.
pub(crate) fn text_columns(class: EntityClass) -> &'static [&'static str] {
    match class {
        EntityClass::Organization => &[
            "name",
            "country",
            "city",
            "description",
            "undergraduate_programs",
            "graduate_programs",
            "admission_requirements",
            "scholarships",
            "campus_facilities",
        ],
        EntityClass::Program => &[
            "name",
            "description",
            "degree_type",
            "field_of_study",
            "admission_requirements",
            "scholarships",
            "language_of_study",
        ],
    }
}

/// Select list for `class`.
pub(crate) fn columns_for(class: EntityClass) -> &'static str {
    match class {
        EntityClass::Organization => ORGANIZATION_COLUMNS,
        EntityClass::Program => PROGRAM_COLUMNS,
    }
}
