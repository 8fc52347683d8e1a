//! Scalar metrics and highlighted renderings derived from an alignment.

use crate::{AlignmentOp, AlignmentResult, ScoreError};

/// Word-error metrics derived from an alignment's operation counts.
///
/// - WER = (S + D + I) / reference length
/// - MER = (S + D + I) / (S + D + I + C)
/// - WIL = 1 - (C/m)(C/n), defined as 1.0 for an empty hypothesis
#[derive(Debug, Clone, PartialEq)]
pub struct WerBreakdown {
    pub wer: f64,
    pub mer: f64,
    pub wil: f64,
    pub correct: usize,
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub total_words: usize,
}

impl WerBreakdown {
    /// Derive the metric family from operation counts.
    ///
    /// Fails with [`ScoreError::EmptyReference`] when the alignment was
    /// built against an empty reference; the rates divide by its length.
    pub fn from_alignment(alignment: &AlignmentResult) -> Result<Self, ScoreError> {
        let m = alignment.reference_len;
        if m == 0 {
            return Err(ScoreError::EmptyReference);
        }
        let n = alignment.hypothesis_len;

        let correct = alignment.match_count();
        let substitutions = alignment.substitution_count();
        let deletions = alignment.deletion_count();
        let insertions = alignment.insertion_count();
        let errors = substitutions + deletions + insertions;

        let wer = errors as f64 / m as f64;
        // errors + correct >= m > 0, so the MER denominator never vanishes
        let mer = errors as f64 / (errors + correct) as f64;
        let wil = if n == 0 {
            1.0
        } else {
            1.0 - (correct as f64 / m as f64) * (correct as f64 / n as f64)
        };

        Ok(Self {
            wer,
            mer,
            wil,
            correct,
            substitutions,
            deletions,
            insertions,
            total_words: m,
        })
    }
}

/// Semantic word error rate: total alignment cost per reference token.
pub fn semantic_wer(alignment: &AlignmentResult) -> Result<f64, ScoreError> {
    if alignment.reference_len == 0 {
        return Err(ScoreError::EmptyReference);
    }
    Ok(alignment.total_cost / alignment.reference_len as f64)
}

/// Render the reference tokens with per-token markup classes.
///
/// Tokens appear in reference order; matches render as `correct`,
/// mismatched pairs as `substitution`, unpaired tokens as `deletion`.
pub fn render_reference(alignment: &AlignmentResult, reference: &[String]) -> String {
    let spans = alignment.ops.iter().filter_map(|op| match op {
        AlignmentOp::Match { ref_index, .. } => Some(span("correct", &reference[*ref_index])),
        AlignmentOp::Substitution { ref_index, .. } => {
            Some(span("substitution", &reference[*ref_index]))
        }
        AlignmentOp::Deletion { ref_index } => Some(span("deletion", &reference[*ref_index])),
        AlignmentOp::Insertion { .. } => None,
    });
    join_spans(spans)
}

/// Render the hypothesis tokens with per-token markup classes.
///
/// Tokens appear in hypothesis order; unpaired tokens render as
/// `insertion`.
pub fn render_hypothesis(alignment: &AlignmentResult, hypothesis: &[String]) -> String {
    let spans = alignment.ops.iter().filter_map(|op| match op {
        AlignmentOp::Match { hyp_index, .. } => Some(span("correct", &hypothesis[*hyp_index])),
        AlignmentOp::Substitution { hyp_index, .. } => {
            Some(span("substitution", &hypothesis[*hyp_index]))
        }
        AlignmentOp::Insertion { hyp_index } => Some(span("insertion", &hypothesis[*hyp_index])),
        AlignmentOp::Deletion { .. } => None,
    });
    join_spans(spans)
}

fn span(class: &str, token: &str) -> String {
    format!("<span class=\"{class}\">{token}</span>")
}

fn join_spans(spans: impl Iterator<Item = String>) -> String {
    spans.collect::<Vec<_>>().join(" ")
}
