/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("intent classification failed: {reason}")]
    ClassificationFault { reason: String },

    #[error("response generation failed: {reason}")]
    GenerationFault { reason: String },

    #[error("failed to generate embedding for query: {reason}")]
    EmbeddingFailed { reason: String },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}
