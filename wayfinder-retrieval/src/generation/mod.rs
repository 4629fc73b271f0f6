//! Response generation.

mod pipeline;
pub mod prompt;

pub use pipeline::ResponsePipeline;

use wayfinder_core::errors::{RetrievalError, WayfinderResult};
use wayfinder_core::models::RetrievalContext;
use wayfinder_core::traits::{IResponseGenerator, ITextModel};

/// `IResponseGenerator` that prompts a text model.
pub struct PromptResponseGenerator<'a> {
    model: &'a dyn ITextModel,
}

impl<'a> PromptResponseGenerator<'a> {
    pub fn new(model: &'a dyn ITextModel) -> Self {
        Self { model }
    }
}

impl IResponseGenerator for PromptResponseGenerator<'_> {
    fn generate(&self, query: &str, context: Option<&RetrievalContext>) -> WayfinderResult<String> {
        let prompt = prompt::build_answer_prompt(query, context);
        self.model.complete(&prompt).map_err(|e| {
            RetrievalError::GenerationFault {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use wayfinder_core::entity::*;
    use wayfinder_core::models::{MatchSource, SearchResult};

    #[derive(Default)]
    struct Recording {
        prompts: Mutex<Vec<String>>,
    }

    impl ITextModel for Recording {
        fn complete(&self, prompt: &str) -> WayfinderResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("answer".to_string())
        }
    }

    fn result(id: i64, record: EntityRecord, org: Option<&str>) -> SearchResult {
        SearchResult {
            entity: Entity {
                id: EntityId(id),
                record,
            },
            organization_name: org.map(str::to_string),
            similarity_score: 1.0,
            match_source: MatchSource::Vector,
        }
    }

    fn context() -> RetrievalContext {
        let org = Organization {
            campus_facilities: Some("Labs and libraries".to_string()),
            ..Organization::new("Northbridge University").with_country("Canada")
        };
        let program = Program {
            duration: Some("2 years".to_string()),
            ..Program::new(EntityId(1), "MSc Data Science")
                .with_degree("Masters")
                .with_field("Data Science")
        };
        RetrievalContext {
            organizations: vec![result(1, org.into(), None)],
            programs: vec![result(7, program.into(), Some("Northbridge University"))],
        }
    }

    #[test]
    fn grounded_prompt_lists_context() {
        let model = Recording::default();
        let answer = PromptResponseGenerator::new(&model)
            .generate("data science in canada", Some(&context()))
            .unwrap();
        assert_eq!(answer, "answer");

        let prompts = model.prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.contains("Based on the following information:"));
        assert!(prompt.contains(concat!(
            "Universities:\n1. Northbridge University (Canada)\n",
            "   Description: Labs and libraries\n\n",
        )));
        assert!(prompt.contains("Courses:\n1. MSc Data Science at Northbridge University\n"));
        assert!(prompt.contains("   Degree: Masters, Field: Data Science\n"));
        assert!(prompt.contains("   Duration: 2 years, Fees: Not specified\n"));
        assert!(prompt.contains("Please answer the user's query:\ndata science in canada"));
    }

    #[test]
    fn empty_context_uses_plain_prompt() {
        let model = Recording::default();
        let generator = PromptResponseGenerator::new(&model);
        generator.generate("hi", Some(&RetrievalContext::default())).unwrap();
        generator.generate("hi", None).unwrap();

        let prompts = model.prompts.lock().unwrap();
        for prompt in prompts.iter() {
            assert!(!prompt.contains("Based on the following information"));
            assert!(prompt.ends_with("Please answer the user's query:\nhi"));
        }
    }

    #[test]
    fn organization_description_falls_back() {
        let org = Organization::new("Coastal College of Arts").with_description("Studio campus");
        let text = prompt::format_organizations(&[result(3, org.into(), None)]);
        assert!(text.contains("(Not specified)"));
        assert!(text.contains("Description: Studio campus"));
    }
}
