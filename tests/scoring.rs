use approx::assert_relative_eq;
use score_rs::scoring::{
    score_plain_with_options, ScoreRequest, ScoreResponse, ScoringOptions, ScoringSession,
};
use score_rs::{
    score_plain, score_semantic, text::tokenize, HashedEmbedding, ScoreError,
};

#[test]
fn identical_texts_score_zero_error() {
    let score = score_plain("The Quick Brown Fox", "the quick  brown fox").unwrap();

    assert_eq!(score.wer, 0.0);
    assert_eq!(score.mer, 0.0);
    assert_eq!(score.wil, 0.0);
    assert_eq!(score.substitutions, 0);
    assert_eq!(score.deletions, 0);
    assert_eq!(score.insertions, 0);
    assert_eq!(score.total_words, 4);
    assert!(score.alignment.iter().all(|op| op.kind == "match"));
}

#[test]
fn single_substitution_scores_quarter_wer() {
    let score = score_plain("I am fine today", "I am find today").unwrap();

    assert_relative_eq!(score.wer, 0.25);
    assert_eq!(score.substitutions, 1);
    assert_eq!(score.deletions, 0);
    assert_eq!(score.insertions, 0);
    assert_eq!(score.total_words, 4);

    let substitution = score
        .alignment
        .iter()
        .find(|op| op.kind == "substitution")
        .expect("one substitution expected");
    assert_eq!(substitution.reference_word.as_deref(), Some("fine"));
    assert_eq!(substitution.hypothesis_word.as_deref(), Some("find"));
}

#[test]
fn single_insertion_scores_third_wer() {
    let score = score_plain("the cat sat", "the big cat sat").unwrap();

    assert_relative_eq!(score.wer, 1.0 / 3.0);
    assert_eq!(score.insertions, 1);
    assert_eq!(score.substitutions, 0);
    assert_eq!(score.deletions, 0);
}

#[test]
fn mer_and_wil_derive_from_counts() {
    // C = 2, S = 1, m = n = 3
    let score = score_plain("a b c", "a x c").unwrap();

    assert_relative_eq!(score.wer, 1.0 / 3.0);
    assert_relative_eq!(score.mer, 1.0 / 3.0);
    assert_relative_eq!(score.wil, 1.0 - (2.0 / 3.0) * (2.0 / 3.0));
}

#[test]
fn empty_hypothesis_is_all_deletions() {
    let score = score_plain("one two three", "").unwrap();

    assert_relative_eq!(score.wer, 1.0);
    assert_relative_eq!(score.wil, 1.0);
    assert_eq!(score.deletions, 3);
    assert_eq!(score.insertions, 0);
    assert_eq!(score.substitutions, 0);
    assert!(score.hypothesis_highlighted.is_empty());
}

#[test]
fn empty_reference_is_an_input_error() {
    assert!(matches!(
        score_plain("", "something"),
        Err(ScoreError::EmptyReference)
    ));
    assert!(matches!(
        score_plain("   \t  ", "something"),
        Err(ScoreError::EmptyReference)
    ));
    assert!(matches!(
        score_semantic("", "something", &HashedEmbedding::default()),
        Err(ScoreError::EmptyReference)
    ));
}

#[test]
fn highlighted_views_mark_each_token_class() {
    let score = score_plain("the cat sat", "the big cat sat").unwrap();

    assert_eq!(
        score.reference_highlighted,
        "<span class=\"correct\">the</span> \
         <span class=\"correct\">cat</span> \
         <span class=\"correct\">sat</span>"
    );
    assert_eq!(
        score.hypothesis_highlighted,
        "<span class=\"correct\">the</span> \
         <span class=\"insertion\">big</span> \
         <span class=\"correct\">cat</span> \
         <span class=\"correct\">sat</span>"
    );
}

#[test]
fn alignment_views_round_trip_both_inputs() {
    let reference = "Gonna Fly  Now";
    let hypothesis = "gonna cry now now";
    let score = score_plain(reference, hypothesis).unwrap();

    let rebuilt_reference: Vec<String> = score
        .alignment
        .iter()
        .filter_map(|op| op.reference_word.clone())
        .collect();
    let rebuilt_hypothesis: Vec<String> = score
        .alignment
        .iter()
        .filter_map(|op| op.hypothesis_word.clone())
        .collect();

    assert_eq!(rebuilt_reference, tokenize(reference));
    assert_eq!(rebuilt_hypothesis, tokenize(hypothesis));
}

#[test]
fn semantic_scoring_with_identical_texts_is_zero() {
    let provider = HashedEmbedding::default();
    let score = score_semantic("mic check one two", "mic check one two", &provider).unwrap();

    assert_eq!(score.wer_percentage, 0.0);
    assert_eq!(score.total_cost, 0.0);
    assert_eq!(score.total_words, 4);
    assert!(score.alignment.iter().all(|op| op.kind == "match"));
}

#[test]
fn oversized_input_is_rejected_before_alignment() {
    let options = ScoringOptions {
        max_token_product: Some(4),
        ..ScoringOptions::default()
    };

    let err = score_plain_with_options("a b c", "x y", &options).unwrap_err();
    match err {
        ScoreError::InputTooLarge {
            reference,
            hypothesis,
            ceiling,
        } => {
            assert_eq!(reference, 3);
            assert_eq!(hypothesis, 2);
            assert_eq!(ceiling, 4);
        }
        other => panic!("expected InputTooLarge, got {other:?}"),
    }
}

#[test]
fn wire_views_serialize_with_snake_case_fields() {
    let score = score_plain("the cat sat", "the big cat sat").unwrap();
    let value = serde_json::to_value(&score).unwrap();

    assert!(value.get("wer").is_some());
    assert!(value.get("mer").is_some());
    assert!(value.get("wil").is_some());
    assert!(value.get("reference_highlighted").is_some());

    let insertion = &value["alignment"][1];
    assert_eq!(insertion["type"], "insertion");
    assert_eq!(insertion["hypothesis_word"], "big");
    assert_eq!(insertion["reference_word"], serde_json::Value::Null);
    assert_eq!(insertion["cost"], 1.0);
}

#[test]
fn requests_parse_from_tagged_json() {
    let request: ScoreRequest = serde_json::from_str(
        r#"{"type":"score_plain","reference":"a b","hypothesis":"a"}"#,
    )
    .unwrap();
    assert_eq!(
        request,
        ScoreRequest::ScorePlain {
            reference: "a b".to_string(),
            hypothesis: "a".to_string(),
        }
    );

    let request: ScoreRequest =
        serde_json::from_str(r#"{"type":"check_repetition","hypothesis":"hmm hmm"}"#).unwrap();
    assert_eq!(
        request,
        ScoreRequest::CheckRepetition {
            hypothesis: "hmm hmm".to_string(),
            threshold: None,
        }
    );
}

#[test]
fn session_dispatches_plain_requests() {
    let session = ScoringSession::<HashedEmbedding>::new(None, ScoringOptions::default());

    let response = session.handle_request(ScoreRequest::ScorePlain {
        reference: "the cat sat".to_string(),
        hypothesis: "the cat sat".to_string(),
    });

    match response {
        ScoreResponse::Plain {
            success,
            score,
            error,
        } => {
            assert!(success);
            assert!(error.is_none());
            assert_eq!(score.unwrap().wer, 0.0);
        }
        other => panic!("expected plain response, got {other:?}"),
    }
}

#[test]
fn session_without_provider_fails_semantic_requests_cleanly() {
    let session = ScoringSession::<HashedEmbedding>::new(None, ScoringOptions::default());

    let response = session.handle_request(ScoreRequest::ScoreSemantic {
        reference: "a".to_string(),
        hypothesis: "a".to_string(),
    });

    match response {
        ScoreResponse::Semantic {
            success,
            score,
            error,
        } => {
            assert!(!success);
            assert!(score.is_none());
            assert!(error.unwrap().contains("provider"));
        }
        other => panic!("expected semantic response, got {other:?}"),
    }
}

#[test]
fn session_with_provider_scores_semantic_requests() {
    let session = ScoringSession::new(
        Some(HashedEmbedding::default()),
        ScoringOptions::default(),
    );

    let response = session.handle_request(ScoreRequest::ScoreSemantic {
        reference: "hello there".to_string(),
        hypothesis: "hello there".to_string(),
    });

    match response {
        ScoreResponse::Semantic { success, score, .. } => {
            assert!(success);
            assert_eq!(score.unwrap().wer_percentage, 0.0);
        }
        other => panic!("expected semantic response, got {other:?}"),
    }
}

#[test]
fn session_checks_repetition() {
    let session = ScoringSession::<HashedEmbedding>::new(None, ScoringOptions::default());

    let response = session.handle_request(ScoreRequest::CheckRepetition {
        hypothesis: "hmm hmm hmm hmm hmm test".to_string(),
        threshold: None,
    });

    match response {
        ScoreResponse::Repetition { verdict } => {
            assert!(verdict.is_repetitive);
            assert_eq!(verdict.pattern.as_deref(), Some("hmm"));
        }
        other => panic!("expected repetition response, got {other:?}"),
    }
}

#[test]
fn error_responses_carry_the_failure_and_no_score_fields() {
    let response = ScoreResponse::plain(Err(ScoreError::EmptyReference));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["type"], "plain");
    assert_eq!(value["success"], false);
    assert!(value["error"]
        .as_str()
        .unwrap()
        .contains("reference text produced no tokens"));
    assert!(value.get("wer").is_none());
}
