//! One class's in-memory vectors and the exact cosine scan over them.

use rayon::prelude::*;
use wayfinder_core::constants::MAX_COSINE_DISTANCE;
use wayfinder_core::entity::EntityId;
use wayfinder_core::models::IndexHit;

#[derive(Debug, Clone)]
struct IndexEntry {
    id: EntityId,
    vector: Vec<f32>,
    norm: f64,
}

/// Immutable once published; writers clone and replace it.
#[derive(Debug, Clone)]
pub struct ClassIndex {
    dimensions: usize,
    /// Sorted by ascending id.
    entries: Vec<IndexEntry>,
}

impl ClassIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_ok()
    }

    fn position(&self, id: EntityId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |e| e.id)
    }

    /// Insert or replace. The caller has checked the length.
    pub fn insert(&mut self, id: EntityId, vector: Vec<f32>) {
        let entry = IndexEntry {
            id,
            norm: norm(&vector),
            vector,
        };
        match self.position(id) {
            Ok(i) => self.entries[i] = entry,
            Err(i) => self.entries.insert(i, entry),
        }
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.position(id) {
            Ok(i) => {
                self.entries.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    /// Up to `k` nearest entries by cosine distance, ties by ascending id.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<IndexHit> {
        if k == 0 || self.entries.is_empty() {
            return Vec::new();
        }
        let query_norm = norm(query);

        let mut hits: Vec<IndexHit> = self
            .entries
            .par_iter()
            .map(|e| IndexHit {
                entity_id: e.id,
                distance: cosine_distance(query, query_norm, &e.vector, e.norm),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
        hits.truncate(k);
        hits
    }
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt()
}

/// `1 - cos(a, b)` clamped to `[0, 2]`. A zero-norm side has cosine 0.
pub fn cosine_distance(a: &[f32], a_norm: f64, b: &[f32], b_norm: f64) -> f64 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 1.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    (1.0 - dot / (a_norm * b_norm)).clamp(0.0, MAX_COSINE_DISTANCE)
}
