//! # wayfinder-observability
//!
//! Structured tracing with span definitions, degradation event tracking with
//! recovery status, and a bounded query performance log.

pub mod degradation;
pub mod query_log;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use query_log::{QueryLog, QueryLogEntry};
pub use tracing_setup::init_tracing;
