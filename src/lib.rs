pub mod aligners;
pub mod cost;
pub mod embedding;
pub mod metrics;
pub mod repetition;
pub mod scoring;
pub mod text;

use thiserror::Error;

/// A single step in the alignment between a reference token sequence and a
/// hypothesis token sequence.
///
/// Indices are zero-based positions into the respective tokenized inputs.
/// Deletions consume only a reference token, insertions only a hypothesis
/// token; matches and substitutions consume one of each.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentOp {
    /// The tokens are equal, or close enough under the cost model to be
    /// reported as equal.
    Match {
        ref_index: usize,
        hyp_index: usize,
        cost: f64,
    },
    /// A reference token was replaced by a different hypothesis token.
    Substitution {
        ref_index: usize,
        hyp_index: usize,
        cost: f64,
    },
    /// A reference token with no corresponding hypothesis token.
    Deletion { ref_index: usize },
    /// A hypothesis token with no corresponding reference token.
    Insertion { hyp_index: usize },
}

/// Cost charged for a deletion or an insertion.
pub const GAP_COST: f64 = 1.0;

impl AlignmentOp {
    /// The cost this operation contributed to the alignment total.
    pub fn cost(&self) -> f64 {
        match self {
            AlignmentOp::Match { cost, .. } | AlignmentOp::Substitution { cost, .. } => *cost,
            AlignmentOp::Deletion { .. } | AlignmentOp::Insertion { .. } => GAP_COST,
        }
    }

    /// Position of the reference token this operation consumes, if any.
    pub fn ref_index(&self) -> Option<usize> {
        match self {
            AlignmentOp::Match { ref_index, .. }
            | AlignmentOp::Substitution { ref_index, .. }
            | AlignmentOp::Deletion { ref_index } => Some(*ref_index),
            AlignmentOp::Insertion { .. } => None,
        }
    }

    /// Position of the hypothesis token this operation consumes, if any.
    pub fn hyp_index(&self) -> Option<usize> {
        match self {
            AlignmentOp::Match { hyp_index, .. }
            | AlignmentOp::Substitution { hyp_index, .. }
            | AlignmentOp::Insertion { hyp_index } => Some(*hyp_index),
            AlignmentOp::Deletion { .. } => None,
        }
    }

    /// Operation kind as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            AlignmentOp::Match { .. } => "match",
            AlignmentOp::Substitution { .. } => "substitution",
            AlignmentOp::Deletion { .. } => "deletion",
            AlignmentOp::Insertion { .. } => "insertion",
        }
    }
}

/// Optimal alignment between a reference and a hypothesis token sequence.
///
/// Operations are ordered by traversal position, not computation order:
/// extracting the reference indices (respectively hypothesis indices) in
/// sequence walks each input front to back exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub ops: Vec<AlignmentOp>,
    /// Sum of all operation costs; equal to the final cell of the DP table.
    pub total_cost: f64,
    pub reference_len: usize,
    pub hypothesis_len: usize,
}

impl AlignmentResult {
    pub fn match_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, AlignmentOp::Match { .. }))
            .count()
    }

    pub fn substitution_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, AlignmentOp::Substitution { .. }))
            .count()
    }

    pub fn deletion_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, AlignmentOp::Deletion { .. }))
            .count()
    }

    pub fn insertion_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, AlignmentOp::Insertion { .. }))
            .count()
    }
}

/// Errors surfaced by the scoring entry points.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The reference text tokenized to zero tokens. Error rates divide by
    /// the reference length, so this is a caller input error rather than a
    /// zero score.
    #[error("reference text produced no tokens")]
    EmptyReference,
    /// The embedding provider failed or returned unusable vectors.
    #[error("embedding provider failed: {0}")]
    Embedding(Box<dyn std::error::Error + Send + Sync>),
    /// The reference/hypothesis token-count product exceeds the configured
    /// ceiling for the O(m*n) alignment tables.
    #[error(
        "input too large: {reference} reference x {hypothesis} hypothesis tokens exceeds the ceiling of {ceiling}"
    )]
    InputTooLarge {
        reference: usize,
        hypothesis: usize,
        ceiling: usize,
    },
}

pub use aligners::{OpcodeAligner, WeightedAligner};
pub use cost::{CostModel, ExactMatchCost, SemanticCost};
pub use embedding::{EmbeddingProvider, HashedEmbedding};
pub use metrics::WerBreakdown;
pub use repetition::{check_repetition, RepetitionConfig, RepetitionDetector, RepetitionVerdict};
pub use scoring::{score_plain, score_semantic, PlainScore, ScoringOptions, SemanticScore};
