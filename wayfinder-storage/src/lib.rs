//! # wayfinder-storage
//!
//! SQLite persistence for organizations, programs, and their embeddings.
//! One write connection serializes writes; a round-robin read pool serves
//! readers concurrently under WAL.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use wayfinder_core::errors::{StorageError, WayfinderError};

/// Wrap a SQLite failure message as a storage error.
pub(crate) fn to_storage_err(message: String) -> WayfinderError {
    StorageError::SqliteError { message }.into()
}
