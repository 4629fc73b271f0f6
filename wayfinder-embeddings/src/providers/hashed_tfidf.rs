//! Hashed TF-IDF provider.
//!
//! Terms are FNV-1a hashed into fixed buckets and weighted by sublinear term
//! frequency times a length-based IDF proxy, then L2-normalised. Needs no
//! network or model files, so it is always available.

use std::collections::HashMap;

use wayfinder_core::errors::WayfinderResult;
use wayfinder_core::models::EmbeddingMode;
use wayfinder_core::traits::IEmbeddingProvider;

pub struct HashedTfIdfProvider {
    dimensions: usize,
}

impl HashedTfIdfProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in term.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
        (h % dims as u64) as usize
    }

    fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(str::to_lowercase)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in Self::terms(text) {
            *counts.entry(term).or_default() += 1;
        }

        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in &counts {
            let tf = 1.0 + (*count as f32).ln();
            let idf = 1.0 + (term.len() as f32).ln();
            vec[Self::bucket(term, self.dimensions)] += tf * idf;
        }

        let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            vec.iter_mut().for_each(|v| *v /= norm);
        }
        vec
    }
}

impl IEmbeddingProvider for HashedTfIdfProvider {
    /// Mode does not change the vector; documents and queries share a space.
    fn embed(&self, text: &str, _mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn embed_batch(
        &self,
        texts: &[String],
        _mode: EmbeddingMode,
    ) -> WayfinderResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-tfidf"
    }

    fn is_available(&self) -> bool {
        true
    }
}
