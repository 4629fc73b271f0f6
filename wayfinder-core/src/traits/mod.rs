mod embedding;
mod generation;
mod index;
mod intent;
mod storage;

pub use embedding::IEmbeddingProvider;
pub use generation::{IResponseGenerator, ITextModel};
pub use index::IVectorIndex;
pub use intent::IIntentClassifier;
pub use storage::{EmbeddingScan, IEmbeddingStore, IEntityRepository};
