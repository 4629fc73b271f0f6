//! Embedding caches.

pub mod l1_memory;

pub use l1_memory::L1MemoryCache;

use wayfinder_core::models::EmbeddingMode;

/// blake3 digest of provider, task type and text. Vectors from different
/// providers live in different spaces, so they never share an entry; the
/// same text embedded as a document and as a query also caches separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

pub fn cache_key(provider: &str, mode: EmbeddingMode, text: &str) -> CacheKey {
    let mut hasher = blake3::Hasher::new();
    hasher.update(provider.as_bytes());
    hasher.update(&[0]);
    hasher.update(mode.task_type().as_bytes());
    hasher.update(&[0]);
    hasher.update(text.as_bytes());
    CacheKey(*hasher.finalize().as_bytes())
}
