//! Consonant/vowel classification and relevant-feature selection.

use crate::features::{Feature, FeatureSystem};

impl FeatureSystem {
    /// True iff `segment` is in the consonant set.
    #[inline]
    pub fn is_consonant(&self, segment: char) -> bool {
        self.consonants.contains(&segment)
    }

    /// Features compared between `a` and `b`: the consonant set if either
    /// segment is a consonant, otherwise the vowel set.
    #[inline]
    pub fn relevant_features(&self, a: char, b: char) -> &[Feature] {
        if self.is_consonant(a) || self.is_consonant(b) {
            &self.consonant_features
        } else {
            &self.vowel_features
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::features::{Feature, FeatureSystem};

    #[test]
    fn test_is_consonant() {
        let system = FeatureSystem::kondrak();
        assert!(system.is_consonant('t'));
        assert!(system.is_consonant('ŋ'));
        assert!(!system.is_consonant('a'));
        assert!(!system.is_consonant('ə'));
        // Not in the table at all.
        assert!(!system.is_consonant('7'));
    }

    #[test]
    fn test_one_consonant_forces_consonant_features() {
        let system = FeatureSystem::kondrak();
        let mixed = system.relevant_features('j', 'i');
        assert!(mixed.contains(&Feature::Place));
        assert!(mixed.contains(&Feature::Manner));
        assert!(!mixed.contains(&Feature::Round));

        assert_eq!(system.relevant_features('i', 'j'), mixed);
    }

    #[test]
    fn test_two_vowels_use_vowel_features() {
        let system = FeatureSystem::kondrak();
        let vowels = system.relevant_features('i', 'u');
        assert!(vowels.contains(&Feature::High));
        assert!(vowels.contains(&Feature::Round));
        assert!(!vowels.contains(&Feature::Place));
    }
}
