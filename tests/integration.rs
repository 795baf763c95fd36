//! Integration tests for phonalign.
//!
//! These tests drive the public API end to end: alignment of known word
//! pairs, custom feature systems, and the wordlist batch pipeline.

use std::io::Write;
use std::path::Path;

use phonalign::align::Aligner;
use phonalign::batch::align_wordlist;
use phonalign::error::AlignError;
use phonalign::features::FeatureSystem;
use phonalign::models::{EditOp, ScoringParams};
use phonalign::output::{format_alignment, write_csv_file, write_json_file};
use phonalign::wordlist::load_wordlist;

/// Kondrak's published configuration with a negative indel score.
fn negative_skip_aligner() -> Aligner {
    let params = ScoringParams {
        skip: -10.0,
        ..Default::default()
    };
    Aligner::new(FeatureSystem::kondrak(), params).unwrap()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

/// Write `content` to a temporary file with the given extension.
fn temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_theta_in_tenwis() {
    let aligner = Aligner::default();
    let result = aligner.align_str("θin", "tenwis", 0.0).unwrap();

    let expected = pairs(&[("θ", "t"), ("i", "e"), ("n", "n"), ("-", "w"), ("-", "i"), ("-", "s")]);
    assert!(result.iter().any(|a| a.to_strings() == expected));
    assert_eq!(
        format_alignment(&result[0]),
        "θ i n - - -\n| | | | | |\nt e n w i s"
    );
}

#[test]
fn test_theta_in_tenwis_negative_skip() {
    let aligner = negative_skip_aligner();
    let result = aligner.align_str("θin", "tenwis", 0.0).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].to_strings(), pairs(&[("θ", "t"), ("i", "e"), ("n", "n")]));
    assert!((result[0].score - 80.5).abs() < 1e-9);
}

#[test]
fn test_near_optimal_alignments_use_expansion() {
    let aligner = negative_skip_aligner();
    let result = aligner.align_str("təŋ", "tsuŋə", 0.2).unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|a| a.has_op(EditOp::Expansion)));
    assert_eq!(
        result[0].to_strings(),
        pairs(&[("t", "ts"), ("ə", "u"), ("ŋ", "ŋ")])
    );
    assert_eq!(
        result[1].to_strings(),
        pairs(&[("t", "ts"), ("ə", "u"), ("ŋ", "ŋ"), ("-", "ə")])
    );
    assert!((result[0].score - 85.0).abs() < 1e-9);
    assert!((result[1].score - 75.0).abs() < 1e-9);
}

#[test]
fn test_near_optimal_default_params() {
    let aligner = Aligner::default();
    let result = aligner.align_str("təŋ", "tsuŋə", 0.1).unwrap();

    assert!(result.len() >= 2);
    assert_eq!(result[0].end, (3, 4));
    assert_eq!(result[1].end, (3, 5));
}

#[test]
fn test_empty_first_sequence() {
    let aligner = Aligner::default();
    assert!(aligner.align_str("", "abc", 0.0).unwrap().is_empty());
}

#[test]
fn test_digit_is_unknown_segment() {
    let aligner = Aligner::default();
    let err = aligner.align_str("t3n", "ten", 0.0).unwrap_err();
    assert!(matches!(err, AlignError::UnknownSegment { segment: '3' }));

    let err = aligner.align_str("ten", "te5", 0.0).unwrap_err();
    assert!(matches!(err, AlignError::UnknownSegment { segment: '5' }));
}

#[test]
fn test_identical_vowels_and_vowel_weight() {
    let params = ScoringParams {
        vowel_weight: 10.0,
        ..Default::default()
    };
    let aligner = Aligner::new(FeatureSystem::kondrak(), params).unwrap();
    let scorer = aligner.scorer();

    assert_eq!(scorer.feature_distance('a', 'a').unwrap(), 0.0);
    assert_eq!(scorer.feature_distance('u', 'u').unwrap(), 0.0);
    assert_eq!(scorer.vowel_weight('a').unwrap(), 10.0);
    assert_eq!(scorer.vowel_weight('o').unwrap(), 10.0);
}

#[test]
fn test_combining_mark_is_its_own_segment() {
    let aligner = Aligner::default();
    // 'a' followed by U+0303 COMBINING TILDE: two scalars, the mark is unknown
    let err = aligner.align_str("a\u{303}", "a", 0.0).unwrap_err();
    assert!(matches!(err, AlignError::UnknownSegment { segment: '\u{303}' }));
}

#[test]
fn test_repeated_calls_are_identical() {
    let aligner = Aligner::default();
    let first = aligner.align_str("tsuŋə", "təŋ", 0.3).unwrap();
    for _ in 0..5 {
        assert_eq!(aligner.align_str("tsuŋə", "təŋ", 0.3).unwrap(), first);
    }
}

#[test]
fn test_custom_feature_system_roundtrip() {
    let json = FeatureSystem::kondrak().to_json_string().unwrap();
    let file = temp_file(&json, ".json");

    let system = FeatureSystem::from_json_file(file.path()).unwrap();
    let custom = Aligner::new(system, ScoringParams::default()).unwrap();
    let builtin = Aligner::default();

    assert_eq!(
        custom.align_str("θin", "tenwis", 0.1).unwrap(),
        builtin.align_str("θin", "tenwis", 0.1).unwrap()
    );
}

#[test]
fn test_malformed_feature_system_fails_at_load() {
    let json = FeatureSystem::kondrak()
        .to_json_string()
        .unwrap()
        .replacen("\"stop\"", "\"plosive\"", 1);
    assert!(matches!(
        FeatureSystem::from_json_str(&json),
        Err(AlignError::Configuration { .. })
    ));

    assert!(matches!(
        FeatureSystem::from_json_str("{ not json"),
        Err(AlignError::Json { .. })
    ));
}

#[test]
fn test_wordlist_batch_pipeline() {
    let csv = "Proto,Daughter,Sister\n\
               θin,tenwis,\n\
               təŋ,tsuŋə,taŋ\n\
               pa7,pa,\n";
    let file = temp_file(csv, ".csv");

    let wordlist = load_wordlist(file.path(), true).unwrap();
    assert_eq!(wordlist.languages, vec!["Proto", "Daughter", "Sister"]);
    assert_eq!(wordlist.rows.len(), 3);

    let word_pairs = wordlist.word_pairs();
    // Row 0: one pair, row 1: three pairs, row 2: one pair
    assert_eq!(word_pairs.len(), 5);

    let aligner = Aligner::default();
    let result = align_wordlist(&aligner, &word_pairs, 0.0, false).unwrap();

    assert_eq!(result.summary.pair_count, 5);
    assert_eq!(result.summary.failed_count, 1);
    assert_eq!(result.results.len(), 4);
    assert_eq!(result.failures[0].pair.first, "pa7");

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("out.json");
    let csv_path = dir.path().join("out.csv");
    write_json_file(&result, &json_path).unwrap();
    write_csv_file(&result, &csv_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["pair_count"], 5);
    assert_eq!(json["results"][0]["pair"]["first"], "θin");

    let csv_out = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv_out.lines().next().unwrap().starts_with("row,"));
    assert!(csv_out.contains("θ:t i:e n:n -:w -:i -:s"));
}

#[test]
fn test_wordlist_from_xlsx() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cognates.xlsx");
    let wordlist = load_wordlist(&path, true).unwrap();

    assert_eq!(wordlist.languages, vec!["Proto", "Daughter", "Sister"]);
    assert_eq!(wordlist.rows.len(), 3);
    assert_eq!(
        wordlist.rows[0],
        vec![Some("θin".to_string()), Some("tenwis".to_string()), None]
    );
    assert_eq!(wordlist.rows[1][2].as_deref(), Some("taŋ"));
    // Numeric cell comes through as text
    assert_eq!(wordlist.rows[2][1].as_deref(), Some("7"));

    let result = align_wordlist(&Aligner::default(), &wordlist.word_pairs(), 0.0, false).unwrap();
    assert_eq!(result.summary.pair_count, 5);
    assert_eq!(result.summary.failed_count, 1);
    assert!((result.results[0].best_score - 110.5).abs() < 1e-9);
}

#[test]
fn test_batch_with_out_of_range_epsilon_fails_whole_run() {
    let file = temp_file("θin,tenwis\ntəŋ,tsuŋə\n", ".csv");
    let word_pairs = load_wordlist(file.path(), false).unwrap().word_pairs();

    let outcome = align_wordlist(&Aligner::default(), &word_pairs, 2.0, false);
    assert!(matches!(outcome, Err(AlignError::InvalidInput { .. })));
}

#[test]
fn test_wordlist_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    assert!(load_wordlist(&missing, false).is_err());
}
