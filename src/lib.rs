//! Phonalign: Phonetic Sequence Alignment Library
//!
//! Aligns phonetic transcriptions with Kondrak's ALINE algorithm: a local
//! alignment over IPA segments with insertions, deletions, substitutions and
//! one-to-two expansions/compressions, scored by salience-weighted
//! articulatory feature distance. Near-optimal alignments within a fraction
//! `epsilon` of the best score can be retrieved as well.
//!
//! # Example
//!
//! ```
//! use phonalign::prelude::*;
//!
//! let aligner = Aligner::default();
//! let alignments = aligner.align_str("θin", "tenwis", 0.0).unwrap();
//!
//! for alignment in &alignments {
//!     println!("{}", format_alignment(alignment));
//! }
//! assert_eq!(alignments[0].pairs[0], AlignedPair(Slot::One('θ'), Slot::One('t')));
//! ```
//!
//! # Batch Example
//!
//! ```no_run
//! use phonalign::prelude::*;
//! use std::path::Path;
//!
//! let wordlist = load_wordlist(Path::new("cognates.csv"), true).unwrap();
//! let aligner = Aligner::default().with_deduplication(true);
//!
//! let result = align_wordlist(&aligner, &wordlist.word_pairs(), 0.1, true).unwrap();
//! write_json_file(&result, Path::new("alignments.json")).unwrap();
//! ```

pub mod align;
pub mod batch;
pub mod classify;
pub mod error;
pub mod features;
pub mod matrix;
pub mod models;
pub mod output;
pub mod scoring;
pub mod table;
pub mod wordlist;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::align::{check_epsilon, Aligner, SCORE_TOLERANCE};
    pub use crate::batch::align_wordlist;
    pub use crate::error::AlignError;
    pub use crate::features::{
        Feature, FeatureSystem, FeatureSystemDef, FeatureValue, FeatureVector, Salience,
        SimilarityScale,
    };
    pub use crate::matrix::ScoreMatrix;
    pub use crate::models::{
        AlignedPair, Alignment, BatchResult, BatchSummary, EditOp, PairAlignment, PairFailure,
        ScoringParams, Slot, WordPair, GAP_MARKER,
    };
    pub use crate::output::{
        format_alignment, format_matrix, format_pairs, print_alignments, print_pair_results, print_summary,
        write_csv, write_csv_file, write_json, write_json_file, OutputError,
    };
    pub use crate::scoring::Scorer;
    pub use crate::table::{CONSONANT_FEATURES, VOWEL_FEATURES};
    pub use crate::wordlist::{load_wordlist, parse_csv_str, Wordlist, WordlistError};
}

// Re-export commonly used types at the crate root
pub use align::Aligner;
pub use error::AlignError;
pub use features::FeatureSystem;
pub use models::{Alignment, ScoringParams};
