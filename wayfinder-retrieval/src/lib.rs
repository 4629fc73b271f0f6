//! # wayfinder-retrieval
//!
//! Query-time retrieval over organizations and programs.
//!
//! ```text
//! query ─▶ IntentRouter ─▶ embed (Query mode) ─▶ ContextAssembler
//!                                                   │ per class
//!                                                   ▼
//!                                   SearchEngine ─▶ VectorIndex (cosine scan)
//!                                        │ IndexUnavailable
//!                                        ▼
//!                                   lexical fallback (score 0.5)
//! ```

pub mod context;
pub mod engine;
pub mod generation;
pub mod index;
pub mod intent;
pub mod search;

pub use context::{ContextAssembler, ContextLimits};
pub use engine::RetrievalEngine;
pub use generation::{PromptResponseGenerator, ResponsePipeline};
pub use index::{IndexConsistencyReport, RebuildReport, VectorIndex};
pub use intent::{IntentRouter, ModelIntentClassifier};
pub use search::{SearchEngine, SearchOutcome};
