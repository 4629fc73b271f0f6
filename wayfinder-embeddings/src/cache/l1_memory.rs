//! Process-local vector cache backed by moka.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use super::CacheKey;

/// Entries idle this long are dropped even if the cache is not full.
const IDLE_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Bounded by entry count. Vectors are shared, so a hit copies the slice once
/// on the way out rather than inside the cache.
pub struct L1MemoryCache {
    entries: Cache<CacheKey, Arc<[f32]>>,
}

impl L1MemoryCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_entries)
                .time_to_idle(IDLE_EXPIRY)
                .build(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<f32>> {
        self.entries.get(key).map(|v| v.to_vec())
    }

    pub fn insert(&self, key: CacheKey, embedding: &[f32]) {
        self.entries.insert(key, Arc::from(embedding));
    }

    /// Approximate; moka applies writes lazily.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::cache_key;
    use wayfinder_core::models::EmbeddingMode;

    #[test]
    fn insert_and_get() {
        let cache = L1MemoryCache::new(100);
        let key = cache_key("p", EmbeddingMode::Document, "k");
        cache.insert(key, &[1.0, 2.0]);
        assert_eq!(cache.get(&key), Some(vec![1.0, 2.0]));
        assert_eq!(cache.get(&cache_key("p", EmbeddingMode::Query, "k")), None);
    }

    #[test]
    fn clear_drops_entries() {
        let cache = L1MemoryCache::new(100);
        let key = cache_key("p", EmbeddingMode::Document, "a");
        cache.insert(key, &[1.0]);
        cache.clear();
        assert_eq!(cache.get(&key), None);
    }
}
