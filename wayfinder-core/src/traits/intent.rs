use crate::errors::WayfinderResult;
use crate::models::RawIntent;

/// Decides whether a query needs retrieval and what it is about.
pub trait IIntentClassifier: Send + Sync {
    fn classify_intent(&self, query: &str) -> WayfinderResult<RawIntent>;
}
