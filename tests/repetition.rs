use approx::assert_relative_eq;
use score_rs::{check_repetition, RepetitionConfig, RepetitionDetector};

#[test]
fn filler_dominated_text_is_flagged() {
    let verdict = check_repetition("hmm hmm hmm hmm hmm test", 0.7);

    assert!(verdict.is_repetitive);
    assert_eq!(verdict.pattern.as_deref(), Some("hmm"));
    assert_eq!(verdict.window, 1);
    // 5 of 6 tokens; the filler list tightens the threshold to 0.56.
    assert_relative_eq!(verdict.ratio, 5.0 / 6.0);
}

#[test]
fn normal_sentence_is_clean() {
    let verdict = check_repetition("the quick brown fox jumps over the lazy dog", 0.7);

    assert!(!verdict.is_repetitive);
    assert!(verdict.pattern.is_none());
}

#[test]
fn non_filler_repetition_needs_the_nominal_threshold() {
    // "ha" is not on the filler list, so 3/4 stays below a 0.9 threshold
    // but clears a 0.5 one.
    assert!(!check_repetition("ha ha ha no", 0.9).is_repetitive);
    assert!(check_repetition("ha ha ha no", 0.5).is_repetitive);
}

#[test]
fn repeating_bigram_is_caught_by_the_window_scan() {
    let verdict = check_repetition("oh no oh no oh no oh no", 0.7);

    assert!(verdict.is_repetitive);
    assert_eq!(verdict.window, 2);
    assert_eq!(verdict.pattern.as_deref(), Some("oh no"));
    // 4 occurrences over 7 sliding windows.
    assert_relative_eq!(verdict.ratio, 4.0 / 7.0);
}

#[test]
fn short_text_never_flags() {
    let verdict = check_repetition("hmm hmm", 0.7);
    assert!(!verdict.is_repetitive);
}

#[test]
fn injected_filler_list_tightens_detection() {
    let text = "bla bla bla bla ok ok";

    let with_filler = RepetitionDetector::new(
        RepetitionConfig::default().with_fillers(vec!["bla".to_string()]),
    );
    assert!(with_filler.check(text).is_repetitive);

    // 4/6 sits between the scaled (0.56) and nominal (0.7) thresholds.
    let without_filler =
        RepetitionDetector::new(RepetitionConfig::default().with_fillers(Vec::new()));
    assert!(!without_filler.check(text).is_repetitive);
}

#[test]
fn clean_verdict_reports_the_dominant_ratio() {
    let verdict = check_repetition("one two one two three four", 0.7);

    assert!(!verdict.is_repetitive);
    assert_eq!(verdict.window, 1);
    assert_relative_eq!(verdict.ratio, 2.0 / 6.0);
}
