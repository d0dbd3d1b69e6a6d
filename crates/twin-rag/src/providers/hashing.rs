//! Offline embedding provider based on feature hashing
//!
//! Word and character-bigram features are hashed with FNV-1a into a fixed
//! number of buckets and L2-normalised. Texts that share words score a higher
//! cosine similarity than unrelated texts. Deterministic and network-free.

use async_trait::async_trait;

use super::embedding::EmbeddingProvider;
use crate::error::Result;

/// Deterministic feature-hashing embedder
pub struct HashEmbedder {
    dims: usize,
    model: String,
}

impl HashEmbedder {
    /// Create an embedder with `dims` buckets (clamped to at least 1)
    pub fn new(dims: usize) -> Self {
        let dims = dims.max(1);
        Self {
            dims,
            model: format!("hash-fnv1a-{}", dims),
        }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dims];
        let lower = text.to_lowercase();

        for word in lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            embedding[bucket(word.as_bytes(), self.dims)] += 1.0;
        }

        // Bigrams help partial matches
        let bytes = lower.as_bytes();
        for bigram in bytes.windows(2) {
            embedding[bucket(bigram, self.dims)] += 0.5;
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &str {
        "hash"
    }
}

fn bucket(bytes: &[u8], dims: usize) -> usize {
    (fnv1a(bytes) % dims as u64) as usize
}

/// FNV-1a 64-bit
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 14695981039346656037;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}
