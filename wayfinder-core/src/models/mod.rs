mod degradation_event;
mod embedding;
mod intent;
mod retrieval_context;
mod search_result;

pub use degradation_event::DegradationEvent;
pub use embedding::{EmbeddingMode, IndexHit, StoredEmbedding};
pub use intent::{IntentTarget, QueryIntent, RawIntent, SearchScope};
pub use retrieval_context::RetrievalContext;
pub use search_result::{MatchSource, SearchResult};
