//! Edit-operation scores derived from the feature system.
//!
//! Every score is a similarity: higher is better. Substitution and expansion
//! start from their ceiling constant and subtract the weighted feature
//! distance plus a vowel penalty.

use crate::error::AlignError;
use crate::features::{Feature, FeatureSystem, FeatureVector};
use crate::models::ScoringParams;

/// Scoring functions bound to one feature system and one set of constants.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    system: &'a FeatureSystem,
    params: &'a ScoringParams,
}

impl<'a> Scorer<'a> {
    pub fn new(system: &'a FeatureSystem, params: &'a ScoringParams) -> Self {
        Self { system, params }
    }

    pub fn params(&self) -> &ScoringParams {
        self.params
    }

    /// Score of aligning `segment` against a gap. Independent of the segment.
    #[inline]
    pub fn indel_cost(&self, _segment: char) -> f64 {
        self.params.skip
    }

    /// Salience-weighted sum of absolute similarity differences over the
    /// features relevant to `a` and `b`.
    pub fn feature_distance(&self, a: char, b: char) -> Result<f64, AlignError> {
        let fa = self.system.features(a)?;
        let fb = self.system.features(b)?;
        let relevant = self.system.relevant_features(a, b);

        let mut total = 0.0;
        for &feature in relevant {
            let diff = self.feature_value(a, fa, feature)? - self.feature_value(b, fb, feature)?;
            total += self.system.weight(feature)? as f64 * diff.abs();
        }
        Ok(total)
    }

    /// `C_vwl` for vowels, 0 for consonants.
    #[inline]
    pub fn vowel_weight(&self, segment: char) -> Result<f64, AlignError> {
        if !self.system.contains(segment) {
            return Err(AlignError::unknown_segment(segment));
        }
        Ok(if self.system.is_consonant(segment) {
            0.0
        } else {
            self.params.vowel_weight
        })
    }

    pub fn substitution_cost(&self, a: char, b: char) -> Result<f64, AlignError> {
        Ok(self.params.substitution
            - self.feature_distance(a, b)?
            - self.vowel_weight(a)?
            - self.vowel_weight(b)?)
    }

    /// Score of aligning `a` against the adjacent pair `b`. Compression is the
    /// same function with the single segment taken from the other sequence.
    pub fn expansion_cost(&self, a: char, b: (char, char)) -> Result<f64, AlignError> {
        let (b1, b2) = b;
        Ok(self.params.expansion
            - self.feature_distance(a, b1)?
            - self.feature_distance(a, b2)?
            - self.vowel_weight(a)?
            - self.vowel_weight(b1)?.max(self.vowel_weight(b2)?))
    }

    #[inline]
    fn feature_value(
        &self,
        segment: char,
        vector: &FeatureVector,
        feature: Feature,
    ) -> Result<f64, AlignError> {
        let value = vector.get(feature).ok_or_else(|| {
            AlignError::configuration(format!(
                "segment {:?} lacks feature {:?}",
                segment,
                feature.name()
            ))
        })?;
        self.system.similarity(value)
    }
}
