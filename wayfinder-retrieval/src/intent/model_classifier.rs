//! Intent classification backed by a text model.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use wayfinder_core::errors::{RetrievalError, WayfinderResult};
use wayfinder_core::models::RawIntent;
use wayfinder_core::traits::{IIntentClassifier, ITextModel};

/// Candidate starts of a JSON object in free-form model output.
static OBJECT_START: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{").ok());

pub struct ModelIntentClassifier<'a> {
    model: &'a dyn ITextModel,
}

impl<'a> ModelIntentClassifier<'a> {
    pub fn new(model: &'a dyn ITextModel) -> Self {
        Self { model }
    }
}

impl IIntentClassifier for ModelIntentClassifier<'_> {
    fn classify_intent(&self, query: &str) -> WayfinderResult<RawIntent> {
        let reply = self
            .model
            .complete(&build_intent_prompt(query))
            .map_err(|e| RetrievalError::ClassificationFault {
                reason: format!("model call failed: {e}"),
            })?;
        debug!(reply_len = reply.len(), "intent model replied");
        parse_intent_reply(&reply)
    }
}

pub fn build_intent_prompt(query: &str) -> String {
    format!(
        "Analyze this query and determine if it requires looking up university or course \
         information from a database.\n\
         Return a JSON object with:\n\
         - requires_lookup: boolean\n\
         - target: 'university', 'course', or 'both'\n\
         - reason: brief explanation\n\n\
         Query: {query}"
    )
}

/// Pull the first intent object out of a model reply. Code fences,
/// surrounding prose and anything after the object are tolerated.
pub fn parse_intent_reply(reply: &str) -> WayfinderResult<RawIntent> {
    let starts = OBJECT_START
        .as_ref()
        .map(|re| re.find_iter(reply).map(|m| m.start()).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut last_error = None;
    for start in starts {
        let mut stream =
            serde_json::Deserializer::from_str(&reply[start..]).into_iter::<RawIntent>();
        match stream.next() {
            Some(Ok(intent)) => return Ok(intent),
            Some(Err(e)) => last_error = Some(e),
            None => {}
        }
    }

    let reason = match last_error {
        Some(e) => format!("malformed intent JSON: {e}"),
        None => "reply contains no JSON object".to_string(),
    };
    Err(RetrievalError::ClassificationFault { reason }.into())
}
