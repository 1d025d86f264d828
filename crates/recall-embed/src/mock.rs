//! Deterministic embedder for tests and offline operation.
//!
//! Hashes whitespace-split tokens into a fixed number of buckets and
//! normalizes the result. Texts sharing tokens share buckets, so token
//! overlap turns into cosine overlap — enough signal for ranking without a
//! model or a network call. The output is stable across runs and platforms.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use recall_core::Result;

use crate::provider::{Embedder, l2_normalize};

/// Token-bucket hashing embedder.
pub struct HashEmbedder {
    dims: usize,
}

impl HashEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vec = vec![0.0f32; self.dims];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dims as u64) as usize;
            vec[bucket] += 1.0;
        }
        l2_normalize(&mut vec);
        Ok(vec)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "hash"
    }
}
