//! Property tests over random words drawn from the built-in IPA table.

use phonalign::align::{Aligner, SCORE_TOLERANCE};
use phonalign::features::FeatureSystem;
use phonalign::models::{ScoringParams, Slot};
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = char> {
    proptest::sample::select(FeatureSystem::kondrak().segments())
}

fn word_strategy(max_len: usize) -> impl Strategy<Value = Vec<char>> {
    proptest::collection::vec(segment_strategy(), 0..=max_len)
}

fn params_strategy() -> impl Strategy<Value = ScoringParams> {
    (
        proptest::sample::select(vec![-10.0, 0.0, 10.0]),
        proptest::sample::select(vec![5.0, 10.0]),
    )
        .prop_map(|(skip, vowel_weight)| ScoringParams {
            skip,
            vowel_weight,
            ..Default::default()
        })
}

/// Segments of `slot`, gaps contributing nothing.
fn slot_segments(slot: Slot) -> Vec<char> {
    match slot {
        Slot::Gap => Vec::new(),
        Slot::One(a) => vec![a],
        Slot::Two(a, b) => vec![a, b],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: feature distance and substitution score are symmetric
    #[test]
    fn prop_scores_symmetric(a in segment_strategy(), b in segment_strategy()) {
        let aligner = Aligner::default();
        let scorer = aligner.scorer();

        prop_assert_eq!(
            scorer.feature_distance(a, b).unwrap(),
            scorer.feature_distance(b, a).unwrap()
        );
        let ab = scorer.substitution_cost(a, b).unwrap();
        let ba = scorer.substitution_cost(b, a).unwrap();
        prop_assert!((ab - ba).abs() < 1e-9);
    }

    /// Property: a segment is at zero distance from itself and its identity
    /// substitution is never beaten by another substitution
    #[test]
    fn prop_self_identity(a in segment_strategy(), b in segment_strategy()) {
        let aligner = Aligner::default();
        let scorer = aligner.scorer();
        let params = aligner.params();

        prop_assert_eq!(scorer.feature_distance(a, a).unwrap(), 0.0);
        let same = scorer.substitution_cost(a, a).unwrap();
        let expected = params.substitution - 2.0 * scorer.vowel_weight(a).unwrap();
        prop_assert!((same - expected).abs() < 1e-9);
        prop_assert!(same + 1e-9 >= scorer.substitution_cost(a, b).unwrap());
    }

    /// Property: the local-alignment floor keeps every cell non-negative
    #[test]
    fn prop_matrix_non_negative(
        first in word_strategy(7),
        second in word_strategy(7),
        params in params_strategy(),
    ) {
        let aligner = Aligner::new(FeatureSystem::kondrak(), params).unwrap();
        let matrix = aligner.score_matrix(&first, &second).unwrap();

        for i in 0..matrix.rows() {
            for j in 0..matrix.cols() {
                prop_assert!(matrix.get(i, j) >= 0.0);
            }
        }
    }

    /// Property: a larger epsilon never returns fewer alignments
    #[test]
    fn prop_epsilon_monotone(
        first in word_strategy(6),
        second in word_strategy(6),
        params in params_strategy(),
        eps in 0.0f64..0.5,
        extra in 0.0f64..0.5,
    ) {
        let aligner = Aligner::new(FeatureSystem::kondrak(), params).unwrap();
        let narrow = aligner.align(&first, &second, eps).unwrap();
        let wide = aligner.align(&first, &second, eps + extra).unwrap();
        prop_assert!(narrow.len() <= wide.len());
    }

    /// Property: each alignment spells out a contiguous slice of both words,
    /// ending at its start cell, with a score between the threshold and the
    /// start cell's score
    #[test]
    fn prop_alignments_cover_slices(
        first in word_strategy(6),
        second in word_strategy(6),
        params in params_strategy(),
        eps in 0.0f64..=1.0,
    ) {
        let aligner = Aligner::new(FeatureSystem::kondrak(), params).unwrap();
        let matrix = aligner.score_matrix(&first, &second).unwrap();
        let threshold = (1.0 - eps) * matrix.max_score();

        for alignment in aligner.align(&first, &second, eps).unwrap() {
            let (si, sj) = alignment.start;
            let (ei, ej) = alignment.end;

            let firsts: Vec<char> = alignment.pairs.iter().flat_map(|p| slot_segments(p.0)).collect();
            let seconds: Vec<char> = alignment.pairs.iter().flat_map(|p| slot_segments(p.1)).collect();
            prop_assert_eq!(&firsts[..], &first[si..ei]);
            prop_assert_eq!(&seconds[..], &second[sj..ej]);

            prop_assert!(alignment.score <= matrix.get(ei, ej) + 1e-6);
            prop_assert!(alignment.score + 1e-6 >= threshold - SCORE_TOLERANCE);
            prop_assert!(alignment.pairs.iter().all(|p| !(p.0.is_gap() && p.1.is_gap())));
        }
    }

    /// Property: alignment is deterministic
    #[test]
    fn prop_deterministic(
        first in word_strategy(6),
        second in word_strategy(6),
        eps in 0.0f64..=1.0,
    ) {
        let aligner = Aligner::default();
        let a = aligner.align(&first, &second, eps).unwrap();
        let b = aligner.align(&first, &second, eps).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: deduplication only removes repeated pair sequences
    #[test]
    fn prop_dedup_keeps_distinct(
        first in word_strategy(5),
        second in word_strategy(5),
        eps in 0.0f64..=1.0,
    ) {
        let all = Aligner::default().align(&first, &second, eps).unwrap();
        let unique = Aligner::default()
            .with_deduplication(true)
            .align(&first, &second, eps)
            .unwrap();

        let mut distinct: Vec<_> = Vec::new();
        for alignment in &all {
            if !distinct.contains(&&alignment.pairs) {
                distinct.push(&alignment.pairs);
            }
        }
        prop_assert_eq!(unique.len(), distinct.len());
    }
}
