//! Text preparation for scoring.
//!
//! Alignment correctness depends on token identity, so the only
//! normalization applied here is case-folding and whitespace splitting.
//! Punctuation is preserved as part of the token it is attached to.

/// Split text into lower-cased, whitespace-delimited tokens.
///
/// Leading/trailing whitespace and runs of interior whitespace are
/// collapsed by the split; empty input yields an empty sequence.
///
/// # Examples
///
/// ```rust
/// use score_rs::text::tokenize;
///
/// assert_eq!(tokenize("  The  quick Fox "), vec!["the", "quick", "fox"]);
/// assert!(tokenize("").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
