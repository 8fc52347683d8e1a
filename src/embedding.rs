//! Token embedding lookup for the semantic cost model.
//!
//! Embeddings come from an external encoder (typically a remote model
//! service), so the lookup is modeled as an injected capability: the
//! semantic cost model is configured with an [`EmbeddingProvider`] and
//! never reaches for a global. Tests supply deterministic providers with
//! canned vectors; [`HashedEmbedding`] offers an offline stand-in for
//! environments without an encoder.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Boxed error type returned by embedding providers.
pub type EmbeddingError = Box<dyn std::error::Error + Send + Sync>;

/// Source of fixed-length embedding vectors for tokens.
///
/// Implementations must return vectors of a consistent dimension; the
/// semantic cost model rejects ragged batches. A provider backed by a
/// remote encoder should override [`embed_batch`](Self::embed_batch) to
/// issue one request per token sequence instead of one per token.
pub trait EmbeddingProvider {
    /// Embed a single token.
    fn embed(&self, token: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of tokens, returning one vector per token in input
    /// order.
    fn embed_batch(&self, tokens: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        tokens.iter().map(|token| self.embed(token)).collect()
    }
}

const DEFAULT_HASHED_DIM: usize = 64;

/// Deterministic offline embedding provider.
///
/// Hashes character trigrams into a fixed number of buckets, so identical
/// tokens always embed identically and tokens sharing spelling overlap
/// land close together. This is not a semantic encoder; it exists so the
/// scoring pipeline can run end to end (tests, CLI smoke runs) without a
/// model service.
#[derive(Debug, Clone)]
pub struct HashedEmbedding {
    dim: usize,
}

impl HashedEmbedding {
    /// Create a provider emitting `dim`-length vectors. `dim` must be
    /// non-zero.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashedEmbedding {
    fn default() -> Self {
        Self::new(DEFAULT_HASHED_DIM)
    }
}

impl EmbeddingProvider for HashedEmbedding {
    fn embed(&self, token: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dim];

        // Pad with sentinels so single-character tokens still produce a
        // trigram and word boundaries contribute to the signature.
        let padded: Vec<char> = std::iter::once('\u{2}')
            .chain(token.chars())
            .chain(std::iter::once('\u{3}'))
            .collect();

        for window in padded.windows(3) {
            let mut hasher = DefaultHasher::new();
            window.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dim;
            vector[bucket] += 1.0;
        }

        Ok(vector)
    }
}
