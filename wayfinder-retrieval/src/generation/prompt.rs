//! Answer prompts.

use std::fmt::Write;

use wayfinder_core::models::{RetrievalContext, SearchResult};

const PREAMBLE: &str = "You are a helpful assistant for university and course information.";
const MISSING: &str = "Not specified";
const NO_DESCRIPTION: &str = "Information available upon request";

pub fn format_organizations(results: &[SearchResult]) -> String {
    let mut out = String::new();
    if results.is_empty() {
        return out;
    }
    out.push_str("Universities:\n");
    for (i, result) in results.iter().enumerate() {
        let Some(org) = result.entity.record.as_organization() else {
            continue;
        };
        let description = org
            .campus_facilities
            .as_deref()
            .or(org.description.as_deref())
            .unwrap_or(NO_DESCRIPTION);
        let _ = writeln!(
            out,
            "{}. {} ({})",
            i + 1,
            org.name,
            org.country.as_deref().unwrap_or(MISSING)
        );
        let _ = writeln!(out, "   Description: {description}\n");
    }
    out
}

pub fn format_programs(results: &[SearchResult]) -> String {
    let mut out = String::new();
    if results.is_empty() {
        return out;
    }
    out.push_str("Courses:\n");
    for (i, result) in results.iter().enumerate() {
        let Some(p) = result.entity.record.as_program() else {
            continue;
        };
        let field = |v: &Option<String>| v.as_deref().unwrap_or(MISSING).to_string();
        let _ = writeln!(
            out,
            "{}. {} at {}",
            i + 1,
            p.name,
            result.organization_name.as_deref().unwrap_or(MISSING)
        );
        let _ = writeln!(
            out,
            "   Degree: {}, Field: {}",
            field(&p.degree_type),
            field(&p.field_of_study)
        );
        let _ = writeln!(
            out,
            "   Duration: {}, Fees: {}",
            field(&p.duration),
            field(&p.tuition_fee)
        );
        let _ = writeln!(out, "   Application Deadline: {}", field(&p.application_deadline));
        let _ = writeln!(out, "   Description: {}\n", field(&p.description));
    }
    out
}

pub fn format_context(context: &RetrievalContext) -> String {
    format!(
        "{}\n{}",
        format_organizations(&context.organizations),
        format_programs(&context.programs)
    )
}

/// Grounded prompt when `context` has results, plain prompt otherwise.
pub fn build_answer_prompt(query: &str, context: Option<&RetrievalContext>) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "{PREAMBLE}\n\nBased on the following information:\n\n{}\n\n\
             Please answer the user's query:\n{query}\n\n\
             If the information provided doesn't fully answer the query, \
             acknowledge that and provide what you can.",
            format_context(context)
        ),
        None => format!("{PREAMBLE}\n\nPlease answer the user's query:\n{query}"),
    }
}
