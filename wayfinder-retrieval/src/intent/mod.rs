//! Intent routing.
//!
//! The router owns the failure policy and target normalization; the
//! classifier behind it only produces a raw verdict.

mod model_classifier;

pub use model_classifier::{build_intent_prompt, parse_intent_reply, ModelIntentClassifier};

use tracing::{debug, warn};
use wayfinder_core::errors::RetrievalError;
use wayfinder_core::models::{IntentTarget, QueryIntent, RawIntent};
use wayfinder_core::traits::IIntentClassifier;

pub struct IntentRouter<'a> {
    classifier: &'a dyn IIntentClassifier,
}

impl<'a> IntentRouter<'a> {
    pub fn new(classifier: &'a dyn IIntentClassifier) -> Self {
        Self { classifier }
    }

    /// Classify `query`. Classifier faults yield a no-lookup intent.
    pub fn classify(&self, query: &str) -> QueryIntent {
        match self.classifier.classify_intent(query) {
            Ok(raw) => {
                let intent = normalize(raw);
                debug!(
                    requires_lookup = intent.requires_lookup,
                    target = %intent.target,
                    "intent classified"
                );
                intent
            }
            Err(e) => {
                let fault = RetrievalError::ClassificationFault {
                    reason: e.to_string(),
                };
                warn!(error = %fault, "intent classification failed, answering without lookup");
                QueryIntent::no_lookup(fault.to_string())
            }
        }
    }
}

/// Map a raw verdict onto a `QueryIntent`.
///
/// Unrecognized targets widen to `Both` when a lookup is required; a
/// no-lookup verdict always targets `None`.
pub fn normalize(raw: RawIntent) -> QueryIntent {
    if !raw.requires_lookup {
        return QueryIntent::no_lookup(raw.reason);
    }
    let target = match IntentTarget::from_label(&raw.target) {
        Some(IntentTarget::None) | None => {
            debug!(label = %raw.target, "unrecognized intent target, searching both classes");
            IntentTarget::Both
        }
        Some(target) => target,
    };
    QueryIntent {
        requires_lookup: true,
        target,
        reason: raw.reason,
    }
}
