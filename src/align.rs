//! ALINE local alignment and near-optimal alignment retrieval.
//!
//! This is the HOT PATH for batch runs: one matrix fill per word pair,
//! then one backward walk per start cell above the threshold.

use tracing::{debug, warn};

use crate::error::AlignError;
use crate::features::FeatureSystem;
use crate::matrix::ScoreMatrix;
use crate::models::{AlignedPair, Alignment, ScoringParams, Slot};
use crate::scoring::Scorer;

/// Absolute slack used whenever a reconstructed score is compared against
/// the threshold. Path sums are reassociated relative to the fill, so exact
/// comparison can reject the path that produced a cell.
pub const SCORE_TOLERANCE: f64 = 1e-9;

/// Immutable alignment configuration: feature system, scoring constants and
/// result deduplication. Shared read-only across worker threads.
#[derive(Debug, Clone)]
pub struct Aligner {
    system: FeatureSystem,
    params: ScoringParams,
    deduplicate: bool,
}

impl Default for Aligner {
    fn default() -> Self {
        Self {
            system: FeatureSystem::kondrak(),
            params: ScoringParams::default(),
            deduplicate: false,
        }
    }
}

impl Aligner {
    /// Validates both the feature system and the constants up front so that
    /// no alignment call can fail on configuration.
    pub fn new(system: FeatureSystem, params: ScoringParams) -> Result<Self, AlignError> {
        params.validate()?;
        system.validate()?;
        Ok(Self {
            system,
            params,
            deduplicate: false,
        })
    }

    /// Collapse alignments with identical pairs from different start cells,
    /// keeping the first in row-major order.
    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn system(&self) -> &FeatureSystem {
        &self.system
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    pub fn deduplicates(&self) -> bool {
        self.deduplicate
    }

    pub fn scorer(&self) -> Scorer<'_> {
        Scorer::new(&self.system, &self.params)
    }

    pub fn score_matrix(&self, first: &[char], second: &[char]) -> Result<ScoreMatrix, AlignError> {
        ScoreMatrix::build(&self.scorer(), first, second)
    }

    /// Align two words given as strings. Each Unicode scalar value is one
    /// segment; combining marks are not merged into their base.
    pub fn align_str(&self, first: &str, second: &str, epsilon: f64) -> Result<Vec<Alignment>, AlignError> {
        let first: Vec<char> = first.chars().collect();
        let second: Vec<char> = second.chars().collect();
        self.align(&first, &second, epsilon)
    }

    /// All alignments scoring within `epsilon` of the best local alignment.
    ///
    /// Start cells are visited in row-major order; each yields one path.
    /// Returns an empty list when either sequence is empty or nothing scores
    /// above zero.
    pub fn align(&self, first: &[char], second: &[char], epsilon: f64) -> Result<Vec<Alignment>, AlignError> {
        check_epsilon(epsilon)?;
        self.check_segments(first)?;
        self.check_segments(second)?;

        if first.is_empty() || second.is_empty() {
            return Ok(Vec::new());
        }

        let scorer = self.scorer();
        let matrix = ScoreMatrix::build(&scorer, first, second)?;
        let max_score = matrix.max_score();
        if max_score <= 0.0 {
            debug!(rows = matrix.rows(), cols = matrix.cols(), "no positive cell");
            return Ok(Vec::new());
        }

        let threshold = (1.0 - epsilon) * max_score;
        let starts = matrix.cells_at_least(threshold, SCORE_TOLERANCE);
        debug!(
            max_score,
            threshold,
            start_cells = starts.len(),
            "score matrix filled"
        );

        let mut alignments = Vec::with_capacity(starts.len());
        for (i, j) in starts {
            let alignment = retrieve(&scorer, &matrix, first, second, (i, j), threshold)?;
            if self.deduplicate && alignments.iter().any(|a: &Alignment| a.pairs == alignment.pairs) {
                continue;
            }
            alignments.push(alignment);
        }

        Ok(alignments)
    }

    fn check_segments(&self, segments: &[char]) -> Result<(), AlignError> {
        match segments.iter().find(|&&s| !self.system.contains(s)) {
            Some(&s) => Err(AlignError::unknown_segment(s)),
            None => Ok(()),
        }
    }
}

/// Reject an epsilon outside `[0, 1]` or non-finite.
pub fn check_epsilon(epsilon: f64) -> Result<(), AlignError> {
    if !epsilon.is_finite() || !(0.0..=1.0).contains(&epsilon) {
        return Err(AlignError::invalid_input(format!(
            "epsilon must lie in [0, 1], got {}",
            epsilon
        )));
    }
    Ok(())
}

/// Backward moves in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    /// One segment of the first sequence against two of the second.
    Expansion,
    /// Two segments of the first sequence against one of the second.
    Compression,
    Substitution,
    /// Segment of the second sequence against a gap.
    Insertion,
    /// Segment of the first sequence against a gap.
    Deletion,
}

impl Move {
    const PRIORITY: [Move; 5] = [
        Move::Expansion,
        Move::Compression,
        Move::Substitution,
        Move::Insertion,
        Move::Deletion,
    ];

    /// Predecessor cell, edge score and pair for this move at `(i, j)`, or
    /// `None` where the move runs off the matrix.
    fn step(
        self,
        scorer: &Scorer<'_>,
        first: &[char],
        second: &[char],
        i: usize,
        j: usize,
    ) -> Result<Option<((usize, usize), f64, AlignedPair)>, AlignError> {
        let step = match self {
            Move::Expansion if i >= 1 && j >= 2 => {
                let (a, b1, b2) = (first[i - 1], second[j - 2], second[j - 1]);
                Some((
                    (i - 1, j - 2),
                    scorer.expansion_cost(a, (b1, b2))?,
                    AlignedPair(Slot::One(a), Slot::Two(b1, b2)),
                ))
            }
            Move::Compression if i >= 2 && j >= 1 => {
                let (a1, a2, b) = (first[i - 2], first[i - 1], second[j - 1]);
                Some((
                    (i - 2, j - 1),
                    scorer.expansion_cost(b, (a1, a2))?,
                    AlignedPair(Slot::Two(a1, a2), Slot::One(b)),
                ))
            }
            Move::Substitution if i >= 1 && j >= 1 => {
                let (a, b) = (first[i - 1], second[j - 1]);
                Some((
                    (i - 1, j - 1),
                    scorer.substitution_cost(a, b)?,
                    AlignedPair(Slot::One(a), Slot::One(b)),
                ))
            }
            Move::Insertion if j >= 1 => {
                let b = second[j - 1];
                Some(((i, j - 1), scorer.indel_cost(b), AlignedPair(Slot::Gap, Slot::One(b))))
            }
            Move::Deletion if i >= 1 => {
                let a = first[i - 1];
                Some(((i - 1, j), scorer.indel_cost(a), AlignedPair(Slot::One(a), Slot::Gap)))
            }
            _ => None,
        };
        Ok(step)
    }
}

/// Walk back from `from` to a zero cell, taking at every cell the first move
/// in priority order whose reconstructed score still reaches `threshold`.
/// A cell with no qualifying move means `matrix` and `scorer` disagree and is
/// an error, never a truncated path.
fn retrieve(
    scorer: &Scorer<'_>,
    matrix: &ScoreMatrix,
    first: &[char],
    second: &[char],
    from: (usize, usize),
    threshold: f64,
) -> Result<Alignment, AlignError> {
    let (mut i, mut j) = from;
    let mut accumulated = 0.0f64;
    let mut pairs = Vec::with_capacity(first.len().max(second.len()));

    'walk: while matrix.get(i, j) != 0.0 {
        for mv in Move::PRIORITY {
            let Some(((pi, pj), cost, pair)) = mv.step(scorer, first, second, i, j)? else {
                continue;
            };
            if matrix.get(pi, pj) + cost + accumulated + SCORE_TOLERANCE >= threshold {
                pairs.push(pair);
                accumulated += cost;
                i = pi;
                j = pj;
                continue 'walk;
            }
        }

        warn!(cell = ?(i, j), start = ?from, "retrieval stalled");
        return Err(AlignError::configuration(format!(
            "no move from cell {:?} reaches threshold {} (retrieval started at {:?})",
            (i, j),
            threshold,
            from
        )));
    }

    // Built backwards
    pairs.reverse();

    Ok(Alignment {
        pairs,
        score: accumulated,
        start: (i, j),
        end: from,
    })
}
