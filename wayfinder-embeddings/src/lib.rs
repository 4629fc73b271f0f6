//! # wayfinder-embeddings
//!
//! Embedding generation for organizations, programs, and queries.
//!
//! ## Architecture
//!
//! ```text
//! EmbeddingEngine
//! ├── DegradationChain (provider fallback)
//! │   ├── RemoteEmbeddingProvider (embedContent over HTTP)
//! │   └── HashedTfIdfProvider (offline, deterministic)
//! ├── L1MemoryCache (moka, keyed by blake3(mode, text))
//! └── normalize (fit to per-class dimensions)
//!
//! BackfillWorker: unembedded entities → engine → embedding store (+ index)
//! ```

pub mod backfill;
pub mod cache;
pub mod degradation;
pub mod engine;
pub mod normalize;
pub mod providers;

pub use backfill::{BackfillReport, BackfillWorker};
pub use degradation::DegradationChain;
pub use engine::EmbeddingEngine;
pub use providers::{HashedTfIdfProvider, RemoteEmbeddingProvider, UnavailableProvider};
