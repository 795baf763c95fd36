//! Data structures for phonetic alignment and batch runs.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::AlignError;

/// Marker printed for an empty slot in an alignment.
pub const GAP_MARKER: char = '-';

/// Scoring constants (maximum similarity scores, Kondrak 2002).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub skip: f64,         // Indel score (C_skip)
    pub substitution: f64, // Substitution ceiling (C_sub)
    pub expansion: f64,    // Expansion/compression ceiling (C_exp)
    pub vowel_weight: f64, // Vowel penalty (C_vwl)
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            skip: 10.0,
            substitution: 35.0,
            expansion: 45.0,
            vowel_weight: 5.0,
        }
    }
}

impl ScoringParams {
    pub fn validate(&self) -> Result<(), AlignError> {
        for (name, value) in [
            ("skip", self.skip),
            ("substitution", self.substitution),
            ("expansion", self.expansion),
            ("vowel_weight", self.vowel_weight),
        ] {
            if !value.is_finite() {
                return Err(AlignError::configuration(format!(
                    "scoring constant {} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// One side of an aligned pair: nothing, one segment, or two adjacent segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Gap,
    One(char),
    Two(char, char),
}

impl Slot {
    /// Number of segments covered.
    pub fn width(&self) -> usize {
        match self {
            Slot::Gap => 0,
            Slot::One(_) => 1,
            Slot::Two(_, _) => 2,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Slot::Gap)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Slot::Gap => write!(f, "{}", GAP_MARKER),
            Slot::One(a) => write!(f, "{}", a),
            Slot::Two(a, b) => write!(f, "{}{}", a, b),
        }
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Edit operation a pair represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOp {
    Substitution,
    /// One segment of the first sequence against two of the second.
    Expansion,
    /// Two segments of the first sequence against one of the second.
    Compression,
    /// Segment of the second sequence against a gap.
    Insertion,
    /// Segment of the first sequence against a gap.
    Deletion,
}

/// A (first, second) correspondence; serializes as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AlignedPair(pub Slot, pub Slot);

impl AlignedPair {
    pub fn first(&self) -> Slot {
        self.0
    }

    pub fn second(&self) -> Slot {
        self.1
    }

    pub fn op(&self) -> EditOp {
        match (self.0.width(), self.1.width()) {
            (0, _) => EditOp::Insertion,
            (_, 0) => EditOp::Deletion,
            (1, 2) => EditOp::Expansion,
            (2, 1) => EditOp::Compression,
            _ => EditOp::Substitution,
        }
    }

    /// Both sides as display strings, gaps as `-`.
    pub fn to_strings(&self) -> (String, String) {
        (self.0.to_string(), self.1.to_string())
    }
}

/// Result of one backward retrieval through the score matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    pub pairs: Vec<AlignedPair>,
    pub score: f64,            // Sum of edge scores along the path
    pub start: (usize, usize), // Zero cell the path begins at
    pub end: (usize, usize),   // Cell the retrieval started from
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn has_op(&self, op: EditOp) -> bool {
        self.pairs.iter().any(|p| p.op() == op)
    }

    /// Pairs as display strings, e.g. `[("θ", "t"), ("-", "w")]`.
    pub fn to_strings(&self) -> Vec<(String, String)> {
        self.pairs.iter().map(AlignedPair::to_strings).collect()
    }

    /// Pair counts per edit operation: (substitutions, expansions, compressions, gaps).
    pub fn op_counts(&self) -> (u32, u32, u32, u32) {
        let mut counts = (0u32, 0u32, 0u32, 0u32);
        for pair in &self.pairs {
            match pair.op() {
                EditOp::Substitution => counts.0 += 1,
                EditOp::Expansion => counts.1 += 1,
                EditOp::Compression => counts.2 += 1,
                EditOp::Insertion | EditOp::Deletion => counts.3 += 1,
            }
        }
        counts
    }
}

/// Two words of one cognate set, in two languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub row: usize,
    pub first_language: String,
    pub second_language: String,
    pub first: String,
    pub second: String,
}

/// Alignments found for one word pair
#[derive(Debug, Clone, Serialize)]
pub struct PairAlignment {
    pub pair: WordPair,
    pub best_score: f64,
    pub alignments: Vec<Alignment>,
}

/// A word pair that could not be aligned
#[derive(Debug, Clone, Serialize)]
pub struct PairFailure {
    pub pair: WordPair,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub pair_count: usize,
    pub aligned_count: usize,
    pub failed_count: usize,
    pub alignment_count: usize,
    pub mean_best_score: f64,
}

/// Full batch result
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub version: String,
    pub feature_system: String,
    pub parameters: ScoringParams,
    pub epsilon: f64,
    pub summary: BatchSummary,
    pub results: Vec<PairAlignment>,
    pub failures: Vec<PairFailure>,
}
