//! Substitution cost models for the weighted aligner.
//!
//! A cost model answers two questions for a (reference token, hypothesis
//! token) pair: what does substituting one for the other cost, and should
//! a substitution at that cost be reported as a match. The exact model
//! gives the classic binary word-error costs; the semantic model weights
//! substitutions by embedding distance so near-synonyms and spelling
//! variants are penalized less than unrelated words.

use ndarray::{Array2, ArrayView1};

use crate::embedding::EmbeddingProvider;
use crate::ScoreError;

/// Default cost below which a weighted substitution is also labelled a
/// match. Empirically chosen; reclassification is for reporting only and
/// never changes the optimal path cost.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.2;

/// Substitution costs for one (reference, hypothesis) sequence pair.
///
/// Models are constructed per scoring call and index into the token
/// sequences they were built from, so any per-token work (embedding
/// lookups in particular) happens once, up front, and the aligner's inner
/// loop stays a pure table computation.
pub trait CostModel {
    /// Substitution cost for aligning reference token `ref_index` with
    /// hypothesis token `hyp_index`. Always non-negative.
    fn cost(&self, ref_index: usize, hyp_index: usize) -> f64;

    /// Whether a substitution at this cost should be reported as a match.
    fn is_match(&self, cost: f64) -> bool;
}

/// Binary cost: 0 for equal tokens, 1 otherwise. Only an exact-cost-zero
/// pair counts as a match.
pub struct ExactMatchCost<'a> {
    reference: &'a [String],
    hypothesis: &'a [String],
}

impl<'a> ExactMatchCost<'a> {
    pub fn new(reference: &'a [String], hypothesis: &'a [String]) -> Self {
        Self {
            reference,
            hypothesis,
        }
    }
}

impl CostModel for ExactMatchCost<'_> {
    fn cost(&self, ref_index: usize, hyp_index: usize) -> f64 {
        if self.reference[ref_index] == self.hypothesis[hyp_index] {
            0.0
        } else {
            1.0
        }
    }

    fn is_match(&self, cost: f64) -> bool {
        cost == 0.0
    }
}

/// Embedding-distance cost: `1 - cosine_similarity(embed(a), embed(b))`.
///
/// Both token sequences are batch-embedded at construction time, so the
/// aligner never suspends on the provider mid-table. Construction fails if
/// the provider errors, returns the wrong number of vectors, or returns
/// vectors of inconsistent dimension.
pub struct SemanticCost {
    reference: Array2<f32>,
    hypothesis: Array2<f32>,
    match_threshold: f64,
}

impl SemanticCost {
    pub fn new(
        provider: &dyn EmbeddingProvider,
        reference: &[String],
        hypothesis: &[String],
    ) -> Result<Self, ScoreError> {
        let reference = embed_matrix(provider, reference)?;
        let hypothesis = embed_matrix(provider, hypothesis)?;

        if reference.nrows() > 0
            && hypothesis.nrows() > 0
            && reference.ncols() != hypothesis.ncols()
        {
            return Err(ScoreError::Embedding(
                format!(
                    "provider returned {}-dimensional reference vectors but {}-dimensional hypothesis vectors",
                    reference.ncols(),
                    hypothesis.ncols()
                )
                .into(),
            ));
        }

        Ok(Self {
            reference,
            hypothesis,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        })
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }
}

impl CostModel for SemanticCost {
    fn cost(&self, ref_index: usize, hyp_index: usize) -> f64 {
        let similarity =
            cosine_similarity(self.reference.row(ref_index), self.hypothesis.row(hyp_index));
        (1.0 - similarity as f64).max(0.0)
    }

    fn is_match(&self, cost: f64) -> bool {
        cost < self.match_threshold
    }
}

/// Cosine similarity of two vectors; 0 when either has zero norm.
pub fn cosine_similarity(u: ArrayView1<'_, f32>, v: ArrayView1<'_, f32>) -> f32 {
    let norm_u = u.dot(&u).sqrt();
    let norm_v = v.dot(&v).sqrt();
    if norm_u == 0.0 || norm_v == 0.0 {
        return 0.0;
    }
    u.dot(&v) / (norm_u * norm_v)
}

/// Batch-embed `tokens` into a matrix with one row per token.
fn embed_matrix(
    provider: &dyn EmbeddingProvider,
    tokens: &[String],
) -> Result<Array2<f32>, ScoreError> {
    let vectors = provider.embed_batch(tokens).map_err(ScoreError::Embedding)?;

    if vectors.len() != tokens.len() {
        return Err(ScoreError::Embedding(
            format!(
                "provider returned {} vectors for {} tokens",
                vectors.len(),
                tokens.len()
            )
            .into(),
        ));
    }

    let dim = vectors.first().map_or(0, Vec::len);
    let mut matrix = Array2::zeros((vectors.len(), dim));
    for (row, vector) in vectors.into_iter().enumerate() {
        if vector.len() != dim {
            return Err(ScoreError::Embedding(
                format!(
                    "provider returned a {}-dimensional vector for token {} in a {}-dimensional batch",
                    vector.len(),
                    row,
                    dim
                )
                .into(),
            ));
        }
        for (col, value) in vector.into_iter().enumerate() {
            matrix[[row, col]] = value;
        }
    }

    Ok(matrix)
}
