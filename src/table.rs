//! Built-in feature system: Kondrak's (2002) ALINE feature assignments
//! extended over the common IPA consonant and vowel inventory.
//!
//! Glides are consonants with vowel-like manner (`high vowel`) so that
//! glide/vowel alternations compare on the consonant feature set.

use std::collections::{HashMap, HashSet};

use crate::features::{Feature, FeatureSystem, FeatureValue, FeatureVector, Salience, SimilarityScale};

use FeatureValue::*;

/// Consonant-relevant features. `aspirated` is left out.
pub const CONSONANT_FEATURES: [Feature; 7] = [
    Feature::Syllabic,
    Feature::Manner,
    Feature::Voice,
    Feature::Nasal,
    Feature::Retroflex,
    Feature::Lateral,
    Feature::Place,
];

/// Vowel-relevant features. `long` is left out.
pub const VOWEL_FEATURES: [Feature; 6] = [
    Feature::Syllabic,
    Feature::Nasal,
    Feature::Retroflex,
    Feature::High,
    Feature::Back,
    Feature::Round,
];

#[derive(Clone, Copy)]
struct Cons {
    place: FeatureValue,
    manner: FeatureValue,
    voice: FeatureValue,
    nasal: FeatureValue,
    retroflex: FeatureValue,
    lateral: FeatureValue,
}

const fn cons(place: FeatureValue, manner: FeatureValue, voice: FeatureValue) -> Cons {
    Cons {
        place,
        manner,
        voice,
        nasal: Minus,
        retroflex: Minus,
        lateral: Minus,
    }
}

const fn nasal(place: FeatureValue) -> Cons {
    Cons {
        nasal: Plus,
        ..cons(place, Stop, Plus)
    }
}

const fn retro(c: Cons) -> Cons {
    Cons {
        retroflex: Plus,
        ..c
    }
}

const fn lat(c: Cons) -> Cons {
    Cons { lateral: Plus, ..c }
}

const CONSONANTS: &[(char, Cons)] = &[
    // stops
    ('p', cons(Bilabial, Stop, Minus)),
    ('b', cons(Bilabial, Stop, Plus)),
    ('t', cons(Alveolar, Stop, Minus)),
    ('d', cons(Alveolar, Stop, Plus)),
    ('ʈ', retro(cons(RetroflexPlace, Stop, Minus))),
    ('ɖ', retro(cons(RetroflexPlace, Stop, Plus))),
    ('c', cons(Palatal, Stop, Minus)),
    ('ɟ', cons(Palatal, Stop, Plus)),
    ('k', cons(Velar, Stop, Minus)),
    ('g', cons(Velar, Stop, Plus)),
    ('ɡ', cons(Velar, Stop, Plus)),
    ('q', cons(Uvular, Stop, Minus)),
    ('ɢ', cons(Uvular, Stop, Plus)),
    ('ʔ', cons(Glottal, Stop, Minus)),
    // nasals
    ('m', nasal(Bilabial)),
    ('ɱ', nasal(Labiodental)),
    ('n', nasal(Alveolar)),
    ('ɳ', retro(nasal(RetroflexPlace))),
    ('ɲ', nasal(Palatal)),
    ('ŋ', nasal(Velar)),
    ('ɴ', nasal(Uvular)),
    // affricates
    ('ʦ', cons(Alveolar, Affricate, Minus)),
    ('ʣ', cons(Alveolar, Affricate, Plus)),
    ('ʧ', cons(PalatoAlveolar, Affricate, Minus)),
    ('ʤ', cons(PalatoAlveolar, Affricate, Plus)),
    // fricatives
    ('ɸ', cons(Bilabial, Fricative, Minus)),
    ('β', cons(Bilabial, Fricative, Plus)),
    ('f', cons(Labiodental, Fricative, Minus)),
    ('v', cons(Labiodental, Fricative, Plus)),
    ('θ', cons(Dental, Fricative, Minus)),
    ('ð', cons(Dental, Fricative, Plus)),
    ('s', cons(Alveolar, Fricative, Minus)),
    ('z', cons(Alveolar, Fricative, Plus)),
    ('ʃ', cons(PalatoAlveolar, Fricative, Minus)),
    ('ʒ', cons(PalatoAlveolar, Fricative, Plus)),
    ('ʂ', retro(cons(RetroflexPlace, Fricative, Minus))),
    ('ʐ', retro(cons(RetroflexPlace, Fricative, Plus))),
    ('ç', cons(Palatal, Fricative, Minus)),
    ('ʝ', cons(Palatal, Fricative, Plus)),
    ('x', cons(Velar, Fricative, Minus)),
    ('ɣ', cons(Velar, Fricative, Plus)),
    ('χ', cons(Uvular, Fricative, Minus)),
    ('ʁ', cons(Uvular, Fricative, Plus)),
    ('ħ', cons(Pharyngeal, Fricative, Minus)),
    ('ʕ', cons(Pharyngeal, Fricative, Plus)),
    ('h', cons(Glottal, Fricative, Minus)),
    ('ɦ', cons(Glottal, Fricative, Plus)),
    ('ɬ', lat(cons(Alveolar, Fricative, Minus))),
    ('ɮ', lat(cons(Alveolar, Fricative, Plus))),
    // approximants, taps and trills
    ('ʋ', cons(Labiodental, Approximant, Plus)),
    ('ɹ', cons(Alveolar, Approximant, Plus)),
    ('ɾ', cons(Alveolar, Approximant, Plus)),
    ('r', retro(cons(RetroflexPlace, Approximant, Plus))),
    ('ʀ', cons(Uvular, Approximant, Plus)),
    ('ɻ', retro(cons(RetroflexPlace, Approximant, Plus))),
    ('ɽ', retro(cons(RetroflexPlace, Approximant, Plus))),
    ('l', lat(cons(Alveolar, Approximant, Plus))),
    ('ɭ', lat(retro(cons(RetroflexPlace, Approximant, Plus)))),
    ('ʎ', lat(cons(Palatal, Approximant, Plus))),
    ('ʟ', lat(cons(Velar, Approximant, Plus))),
];

/// (segment, place, manner, high, back, round)
type VowelRow = (char, FeatureValue, FeatureValue, FeatureValue, FeatureValue, FeatureValue);

const GLIDES: &[VowelRow] = &[
    ('j', Palatal, HighVowel, High, Front, Minus),
    ('ɥ', Palatal, HighVowel, High, Front, Plus),
    ('w', Velar, HighVowel, High, Back, Plus),
    ('ɰ', Velar, HighVowel, High, Back, Minus),
];

const VOWELS: &[VowelRow] = &[
    ('i', Palatal, HighVowel, High, Front, Minus),
    ('y', Palatal, HighVowel, High, Front, Plus),
    ('ɪ', Palatal, HighVowel, High, Front, Minus),
    ('ɨ', Velar, HighVowel, High, Central, Minus),
    ('ʉ', Velar, HighVowel, High, Central, Plus),
    ('ɯ', Velar, HighVowel, High, Back, Minus),
    ('u', Velar, HighVowel, High, Back, Plus),
    ('ʊ', Velar, HighVowel, High, Back, Plus),
    ('e', Palatal, MidVowel, Mid, Front, Minus),
    ('ø', Palatal, MidVowel, Mid, Front, Plus),
    ('ɛ', Palatal, MidVowel, Mid, Front, Minus),
    ('œ', Palatal, MidVowel, Mid, Front, Plus),
    ('ə', Velar, MidVowel, Mid, Central, Minus),
    ('ɘ', Velar, MidVowel, Mid, Central, Minus),
    ('ɤ', Velar, MidVowel, Mid, Back, Minus),
    ('o', Velar, MidVowel, Mid, Back, Plus),
    ('ɔ', Velar, MidVowel, Mid, Back, Plus),
    ('ʌ', Velar, MidVowel, Mid, Back, Minus),
    ('æ', Palatal, LowVowel, Low, Front, Minus),
    ('a', Velar, LowVowel, Low, Central, Minus),
    ('ɐ', Velar, LowVowel, Low, Central, Minus),
    ('ɑ', Velar, LowVowel, Low, Back, Minus),
    ('ɒ', Velar, LowVowel, Low, Back, Plus),
];

fn consonant_vector(c: Cons) -> FeatureVector {
    FeatureVector::new()
        .with(Feature::Syllabic, Minus)
        .with(Feature::Place, c.place)
        .with(Feature::Manner, c.manner)
        .with(Feature::Voice, c.voice)
        .with(Feature::Nasal, c.nasal)
        .with(Feature::Retroflex, c.retroflex)
        .with(Feature::Lateral, c.lateral)
}

fn vocalic_vector(row: &VowelRow, syllabic: FeatureValue) -> FeatureVector {
    let &(_, place, manner, high, back, round) = row;
    FeatureVector::new()
        .with(Feature::Syllabic, syllabic)
        .with(Feature::Place, place)
        .with(Feature::Manner, manner)
        .with(Feature::Voice, Plus)
        .with(Feature::Nasal, Minus)
        .with(Feature::Retroflex, Minus)
        .with(Feature::Lateral, Minus)
        .with(Feature::High, high)
        .with(Feature::Back, back)
        .with(Feature::Round, round)
}

impl FeatureSystem {
    /// The built-in IPA feature system.
    pub fn kondrak() -> Self {
        let size = CONSONANTS.len() + GLIDES.len() + VOWELS.len();
        let mut entries = HashMap::with_capacity(size);
        let mut consonants = HashSet::with_capacity(CONSONANTS.len() + GLIDES.len());

        for &(segment, c) in CONSONANTS {
            entries.insert(segment, consonant_vector(c));
            consonants.insert(segment);
        }
        for row in GLIDES {
            entries.insert(row.0, vocalic_vector(row, Minus));
            consonants.insert(row.0);
        }
        for row in VOWELS {
            entries.insert(row.0, vocalic_vector(row, Plus));
        }

        FeatureSystem {
            name: "kondrak".to_string(),
            entries,
            consonants,
            similarity: SimilarityScale::kondrak(),
            salience: Salience::kondrak(),
            consonant_features: CONSONANT_FEATURES.to_vec(),
            vowel_features: VOWEL_FEATURES.to_vec(),
        }
    }
}
