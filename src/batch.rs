//! Parallel alignment of every word pair in a wordlist.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::align::{check_epsilon, Aligner};
use crate::error::AlignError;
use crate::models::{BatchResult, BatchSummary, PairAlignment, PairFailure, WordPair};

/// Align all `pairs` on the rayon pool. A pair that cannot be aligned (an
/// unknown segment in either word) is recorded as a failure and the run
/// continues. Results keep the input order.
///
/// An invalid `epsilon` fails the whole run before any pair is aligned.
pub fn align_wordlist(
    aligner: &Aligner,
    pairs: &[WordPair],
    epsilon: f64,
    show_progress: bool,
) -> Result<BatchResult, AlignError> {
    check_epsilon(epsilon)?;

    if show_progress {
        eprintln!("Aligning {} word pairs...", pairs.len());
    }

    let progress = if show_progress {
        let pb = ProgressBar::new(pairs.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let outcomes: Vec<Result<PairAlignment, PairFailure>> = pairs
        .par_iter()
        .map(|pair| {
            let outcome = align_pair(aligner, pair, epsilon);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            outcome
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(failure) => failures.push(failure),
        }
    }

    let summary = summarize(pairs.len(), &results, &failures);
    info!(
        pairs = summary.pair_count,
        aligned = summary.aligned_count,
        failed = summary.failed_count,
        "batch alignment finished"
    );

    Ok(BatchResult {
        version: env!("CARGO_PKG_VERSION").to_string(),
        feature_system: aligner.system().name().to_string(),
        parameters: *aligner.params(),
        epsilon,
        summary,
        results,
        failures,
    })
}

fn align_pair(aligner: &Aligner, pair: &WordPair, epsilon: f64) -> Result<PairAlignment, PairFailure> {
    match aligner.align_str(&pair.first, &pair.second, epsilon) {
        Ok(alignments) => {
            let best_score = alignments
                .iter()
                .map(|a| a.score)
                .fold(0.0, f64::max);
            Ok(PairAlignment {
                pair: pair.clone(),
                best_score,
                alignments,
            })
        }
        Err(e) => {
            warn!(
                row = pair.row,
                first = %pair.first,
                second = %pair.second,
                error = %e,
                "skipping word pair"
            );
            Err(PairFailure {
                pair: pair.clone(),
                message: e.to_string(),
            })
        }
    }
}

fn summarize(pair_count: usize, results: &[PairAlignment], failures: &[PairFailure]) -> BatchSummary {
    let aligned: Vec<&PairAlignment> = results.iter().filter(|r| !r.alignments.is_empty()).collect();

    BatchSummary {
        pair_count,
        aligned_count: aligned.len(),
        failed_count: failures.len(),
        alignment_count: results.iter().map(|r| r.alignments.len()).sum(),
        mean_best_score: if aligned.is_empty() {
            0.0
        } else {
            aligned.iter().map(|r| r.best_score).sum::<f64>() / aligned.len() as f64
        },
    }
}
