//! Error taxonomy. One root enum, one enum per subsystem, `#[from]` between them.

mod config_error;
mod embedding_error;
mod index_error;
mod retrieval_error;
mod storage_error;
mod wayfinder_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use index_error::IndexError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;
pub use wayfinder_error::{WayfinderError, WayfinderResult};
