//! Scoring entry points and the wire-level request/response surface.
//!
//! The library contract is three operations: [`score_plain`] (classic
//! WER/MER/WIL with highlighted diffs), [`score_semantic`]
//! (embedding-weighted error rate), and repetition checking. The
//! [`ScoringSession`] wraps them behind serde message enums for hosts that
//! drive scoring over a line protocol.

use serde::{Deserialize, Serialize};

use crate::aligners::{OpcodeAligner, WeightedAligner};
use crate::cost::{SemanticCost, DEFAULT_MATCH_THRESHOLD};
use crate::embedding::EmbeddingProvider;
use crate::metrics::{self, WerBreakdown};
use crate::repetition::{RepetitionConfig, RepetitionDetector, RepetitionVerdict};
use crate::text;
use crate::{AlignmentOp, AlignmentResult, ScoreError};

/// Wire-friendly projection of an [`AlignmentOp`].
///
/// Indices and words are present only for the side(s) the operation
/// consumes. Costs are rounded to four decimals for stable payloads.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AlignmentOpView {
    #[serde(rename = "type")]
    pub kind: String,
    pub reference_word: Option<String>,
    pub hypothesis_word: Option<String>,
    pub reference_index: Option<usize>,
    pub hypothesis_index: Option<usize>,
    pub cost: f64,
}

impl AlignmentOpView {
    fn from_op(op: &AlignmentOp, reference: &[String], hypothesis: &[String]) -> Self {
        Self {
            kind: op.kind().to_string(),
            reference_word: op.ref_index().map(|index| reference[index].clone()),
            hypothesis_word: op.hyp_index().map(|index| hypothesis[index].clone()),
            reference_index: op.ref_index(),
            hypothesis_index: op.hyp_index(),
            cost: round_to(op.cost(), 4),
        }
    }
}

/// Project a full alignment into wire views, in traversal order.
pub fn alignment_views(
    alignment: &AlignmentResult,
    reference: &[String],
    hypothesis: &[String],
) -> Vec<AlignmentOpView> {
    alignment
        .ops
        .iter()
        .map(|op| AlignmentOpView::from_op(op, reference, hypothesis))
        .collect()
}

/// Result of [`score_plain`].
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PlainScore {
    pub wer: f64,
    pub mer: f64,
    pub wil: f64,
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub total_words: usize,
    pub alignment: Vec<AlignmentOpView>,
    pub reference_highlighted: String,
    pub hypothesis_highlighted: String,
}

/// Result of [`score_semantic`].
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SemanticScore {
    /// Semantic WER as a percentage, rounded to two decimals.
    pub wer_percentage: f64,
    pub total_words: usize,
    /// Total alignment cost, rounded to four decimals.
    pub total_cost: f64,
    pub alignment: Vec<AlignmentOpView>,
}

/// Caller-configurable scoring knobs.
#[derive(Debug, Clone)]
pub struct ScoringOptions {
    /// Substitution cost below which the semantic aligner labels the pair
    /// a match.
    pub match_threshold: f64,
    /// Ceiling on `reference_tokens * hypothesis_tokens`; both aligners
    /// build O(m*n) tables, so hosts should bound unvetted input sizes.
    pub max_token_product: Option<usize>,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            max_token_product: None,
        }
    }
}

impl ScoringOptions {
    fn check_size(&self, reference: usize, hypothesis: usize) -> Result<(), ScoreError> {
        if let Some(ceiling) = self.max_token_product {
            if reference.saturating_mul(hypothesis) > ceiling {
                return Err(ScoreError::InputTooLarge {
                    reference,
                    hypothesis,
                    ceiling,
                });
            }
        }
        Ok(())
    }
}

/// Score `hypothesis` against `reference` with binary word matching.
pub fn score_plain(reference: &str, hypothesis: &str) -> Result<PlainScore, ScoreError> {
    score_plain_with_options(reference, hypothesis, &ScoringOptions::default())
}

pub fn score_plain_with_options(
    reference: &str,
    hypothesis: &str,
    options: &ScoringOptions,
) -> Result<PlainScore, ScoreError> {
    let ref_tokens = text::tokenize(reference);
    let hyp_tokens = text::tokenize(hypothesis);
    if ref_tokens.is_empty() {
        return Err(ScoreError::EmptyReference);
    }
    options.check_size(ref_tokens.len(), hyp_tokens.len())?;

    let alignment = OpcodeAligner::align(&ref_tokens, &hyp_tokens);
    let breakdown = WerBreakdown::from_alignment(&alignment)?;

    Ok(PlainScore {
        wer: breakdown.wer,
        mer: breakdown.mer,
        wil: breakdown.wil,
        substitutions: breakdown.substitutions,
        deletions: breakdown.deletions,
        insertions: breakdown.insertions,
        total_words: breakdown.total_words,
        reference_highlighted: metrics::render_reference(&alignment, &ref_tokens),
        hypothesis_highlighted: metrics::render_hypothesis(&alignment, &hyp_tokens),
        alignment: alignment_views(&alignment, &ref_tokens, &hyp_tokens),
    })
}

/// Score `hypothesis` against `reference` with embedding-weighted
/// substitution costs from `provider`.
pub fn score_semantic(
    reference: &str,
    hypothesis: &str,
    provider: &dyn EmbeddingProvider,
) -> Result<SemanticScore, ScoreError> {
    score_semantic_with_options(reference, hypothesis, provider, &ScoringOptions::default())
}

pub fn score_semantic_with_options(
    reference: &str,
    hypothesis: &str,
    provider: &dyn EmbeddingProvider,
    options: &ScoringOptions,
) -> Result<SemanticScore, ScoreError> {
    let ref_tokens = text::tokenize(reference);
    let hyp_tokens = text::tokenize(hypothesis);
    if ref_tokens.is_empty() {
        return Err(ScoreError::EmptyReference);
    }
    options.check_size(ref_tokens.len(), hyp_tokens.len())?;

    let model = SemanticCost::new(provider, &ref_tokens, &hyp_tokens)?
        .with_match_threshold(options.match_threshold);
    let alignment = WeightedAligner::align(&ref_tokens, &hyp_tokens, &model);
    let wer = metrics::semantic_wer(&alignment)?;

    Ok(SemanticScore {
        wer_percentage: round_to(wer * 100.0, 2),
        total_words: alignment.reference_len,
        total_cost: round_to(alignment.total_cost, 4),
        alignment: alignment_views(&alignment, &ref_tokens, &hyp_tokens),
    })
}

/// Request format accepted by [`ScoringSession`].
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreRequest {
    /// Classic WER/MER/WIL scoring with highlighted diffs.
    ScorePlain {
        reference: String,
        hypothesis: String,
    },
    /// Embedding-weighted scoring via the session's provider.
    ScoreSemantic {
        reference: String,
        hypothesis: String,
    },
    /// Repetition heuristic over the hypothesis text alone.
    CheckRepetition {
        hypothesis: String,
        threshold: Option<f64>,
    },
}

/// Response format produced by [`ScoringSession`].
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreResponse {
    Ready {
        embedding: String,
    },
    Plain {
        success: bool,
        #[serde(flatten)]
        score: Option<PlainScore>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Semantic {
        success: bool,
        #[serde(flatten)]
        score: Option<SemanticScore>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Repetition {
        verdict: RepetitionVerdict,
    },
    Error {
        message: String,
    },
}

impl ScoreResponse {
    pub fn plain(result: Result<PlainScore, ScoreError>) -> Self {
        match result {
            Ok(score) => ScoreResponse::Plain {
                success: true,
                score: Some(score),
                error: None,
            },
            Err(err) => ScoreResponse::Plain {
                success: false,
                score: None,
                error: Some(err.to_string()),
            },
        }
    }

    pub fn semantic(result: Result<SemanticScore, ScoreError>) -> Self {
        match result {
            Ok(score) => ScoreResponse::Semantic {
                success: true,
                score: Some(score),
                error: None,
            },
            Err(err) => ScoreResponse::Semantic {
                success: false,
                score: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Stateless dispatcher binding the scoring operations to a configured
/// embedding provider and option set.
pub struct ScoringSession<P: EmbeddingProvider> {
    provider: Option<P>,
    options: ScoringOptions,
    repetition: RepetitionConfig,
}

impl<P: EmbeddingProvider> ScoringSession<P> {
    /// Create a session. Semantic requests fail cleanly when `provider`
    /// is `None`.
    pub fn new(provider: Option<P>, options: ScoringOptions) -> Self {
        Self {
            provider,
            options,
            repetition: RepetitionConfig::default(),
        }
    }

    pub fn with_repetition_config(mut self, config: RepetitionConfig) -> Self {
        self.repetition = config;
        self
    }

    /// Handle one request and return its response.
    pub fn handle_request(&self, request: ScoreRequest) -> ScoreResponse {
        match request {
            ScoreRequest::ScorePlain {
                reference,
                hypothesis,
            } => ScoreResponse::plain(score_plain_with_options(
                &reference,
                &hypothesis,
                &self.options,
            )),
            ScoreRequest::ScoreSemantic {
                reference,
                hypothesis,
            } => match &self.provider {
                Some(provider) => ScoreResponse::semantic(score_semantic_with_options(
                    &reference,
                    &hypothesis,
                    provider,
                    &self.options,
                )),
                None => ScoreResponse::Semantic {
                    success: false,
                    score: None,
                    error: Some("no embedding provider configured".to_string()),
                },
            },
            ScoreRequest::CheckRepetition {
                hypothesis,
                threshold,
            } => {
                let nominal = threshold.unwrap_or(self.repetition.threshold);
                let config = self.repetition.clone().with_threshold(nominal);
                let verdict = RepetitionDetector::new(config).check(&hypothesis);
                ScoreResponse::Repetition { verdict }
            }
        }
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
