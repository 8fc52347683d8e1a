//! Degenerate-repetition detection for recognizer output.
//!
//! Sequence-to-sequence recognizers occasionally collapse into emitting
//! one token or a short n-gram over and over. This detector flags such
//! output so the surrounding pipeline can retry recognition with different
//! parameters instead of scoring garbage. It operates on the raw
//! hypothesis text and has no dependency on the aligners.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Nominal fraction of repeated content that triggers detection.
pub const DEFAULT_REPETITION_THRESHOLD: f64 = 0.7;

/// Scale applied to the threshold when the dominant token is a known
/// filler, making the detector more aggressive for them.
pub const DEFAULT_FILLER_SCALE: f64 = 0.8;

/// Texts shorter than this many characters never flag; a pattern cannot
/// establish itself in a few characters.
const MIN_TEXT_CHARS: usize = 10;

/// Hesitation and filler tokens that commonly dominate degenerate decoder
/// output, across the languages the pipeline sees.
static DEFAULT_FILLERS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "हुआ", "hua", "हूँ", "है", "है है", "ह", "aaa", "ааа", "啊啊啊", "음음음", "응응응", "mmm",
        "hmm", "umm", "uh", "ah", "oh",
    ]
    .iter()
    .map(|filler| filler.to_string())
    .collect()
});

/// Tunable knobs for [`RepetitionDetector`].
///
/// The filler list is language-dependent; callers scoring a single
/// language should inject a list for it rather than rely on the mixed
/// default.
#[derive(Debug, Clone)]
pub struct RepetitionConfig {
    pub threshold: f64,
    pub filler_scale: f64,
    pub fillers: Vec<String>,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REPETITION_THRESHOLD,
            filler_scale: DEFAULT_FILLER_SCALE,
            fillers: DEFAULT_FILLERS.clone(),
        }
    }
}

impl RepetitionConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_fillers(mut self, fillers: Vec<String>) -> Self {
        self.fillers = fillers;
        self
    }
}

/// Outcome of a repetition check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepetitionVerdict {
    pub is_repetitive: bool,
    /// The dominant token or n-gram, when one was flagged.
    pub pattern: Option<String>,
    /// Observed frequency ratio of the reported pattern.
    pub ratio: f64,
    /// Window size (1, 2, or 3 tokens) at which repetition was detected;
    /// 1 for clean verdicts.
    pub window: usize,
}

impl RepetitionVerdict {
    fn clean(ratio: f64) -> Self {
        Self {
            is_repetitive: false,
            pattern: None,
            ratio,
            window: 1,
        }
    }

    fn flagged(pattern: &str, ratio: f64, window: usize) -> Self {
        Self {
            is_repetitive: true,
            pattern: Some(pattern.to_string()),
            ratio,
            window,
        }
    }
}

/// Heuristic scanner for pathologically repetitive hypothesis text.
#[derive(Debug, Clone, Default)]
pub struct RepetitionDetector {
    config: RepetitionConfig,
}

impl RepetitionDetector {
    pub fn new(config: RepetitionConfig) -> Self {
        Self { config }
    }

    /// Check `text` for a dominant token or n-gram.
    ///
    /// Step 1 looks at single tokens. Step 2 runs only when the text has
    /// at least 6 tokens and scans sliding windows of 2 and 3 tokens. The
    /// effective threshold is computed once, from the dominant single
    /// token: known fillers tighten it by the configured scale.
    pub fn check(&self, text: &str) -> RepetitionVerdict {
        if text.chars().count() < MIN_TEXT_CHARS {
            return RepetitionVerdict::clean(0.0);
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return RepetitionVerdict::clean(0.0);
        }
        let total = words.len();

        let (dominant, count) = most_frequent(words.iter().map(|word| word.to_string()));
        let ratio = count as f64 / total as f64;

        let lowered = dominant.to_lowercase();
        let is_filler = self
            .config
            .fillers
            .iter()
            .any(|filler| lowered.contains(filler.as_str()));
        let effective_threshold = if is_filler {
            self.config.threshold * self.config.filler_scale
        } else {
            self.config.threshold
        };

        if ratio > effective_threshold {
            log::warn!(
                "detected repetitive transcription: '{}' repeated {}/{} times ({:.2})",
                dominant,
                count,
                total,
                ratio
            );
            return RepetitionVerdict::flagged(&dominant, ratio, 1);
        }

        if total >= 6 {
            for window in [2usize, 3] {
                if total < window * 2 {
                    continue;
                }

                let grams = words
                    .windows(window)
                    .map(|gram| gram.join(" "));
                let (dominant_gram, gram_count) = most_frequent(grams);
                let window_total = total - window + 1;
                let gram_ratio = gram_count as f64 / window_total as f64;

                if gram_ratio > effective_threshold {
                    log::warn!(
                        "detected repetitive sequence: '{}' repeated {} times ({:.2})",
                        dominant_gram,
                        gram_count,
                        gram_ratio
                    );
                    return RepetitionVerdict::flagged(&dominant_gram, gram_ratio, window);
                }
            }
        }

        RepetitionVerdict::clean(ratio)
    }
}

/// Check `text` with default fillers and the given nominal threshold.
pub fn check_repetition(text: &str, threshold: f64) -> RepetitionVerdict {
    RepetitionDetector::new(RepetitionConfig::default().with_threshold(threshold)).check(text)
}

/// Most frequent item and its count; the earliest-seen item wins ties so
/// verdicts are deterministic.
fn most_frequent(items: impl Iterator<Item = String>) -> (String, usize) {
    let items: Vec<String> = items.collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in &items {
        *counts.entry(item.as_str()).or_insert(0) += 1;
    }

    let mut best: (&str, usize) = ("", 0);
    for item in &items {
        let count = counts[item.as_str()];
        if count > best.1 {
            best = (item.as_str(), count);
        }
    }
    (best.0.to_string(), best.1)
}
