use crate::errors::WayfinderResult;
use crate::models::RetrievalContext;

/// A text completion model.
pub trait ITextModel: Send + Sync {
    fn complete(&self, prompt: &str) -> WayfinderResult<String>;
}

/// Produces the final answer for a query, optionally grounded on retrieved context.
pub trait IResponseGenerator: Send + Sync {
    fn generate(&self, query: &str, context: Option<&RetrievalContext>) -> WayfinderResult<String>;
}
