//! Deterministic embedding provider for tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::constants::DEFAULT_EMBEDDING_DIM;
use crate::profile::TasteProfile;

use super::error::{EmbeddingError, EmbeddingResult};
use super::EmbeddingProvider;

/// Produces a deterministic unit-norm vector derived from the taste
/// profile's catalog ids, so identical tastes embed identically.
#[derive(Debug)]
pub struct StubEmbeddingProvider {
    dim: usize,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl StubEmbeddingProvider {
    pub fn new() -> Self {
        Self::with_dim(DEFAULT_EMBEDDING_DIM)
    }

    pub fn with_dim(dim: usize) -> Self {
        Self {
            dim,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent `embed` call fail, for provider-outage tests.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of `embed` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, taste: &TasteProfile) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        for item in taste
            .movies
            .iter()
            .chain(taste.music.iter())
            .chain(taste.shows.iter())
        {
            item.id.hash(&mut hasher);
        }
        let mut seed = hasher.finish();

        let mut vector = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            // xorshift64; cheap and reproducible.
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            vector.push(((seed % 2000) as f32 - 1000.0) / 1000.0);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for StubEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    async fn embed(&self, taste: &TasteProfile) -> EmbeddingResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::InvalidResponse {
                reason: "stub provider configured to fail".to_string(),
            });
        }
        Ok(self.vector_for(taste))
    }
}
