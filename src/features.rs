//! Phonetic feature system: features, feature values, the per-segment feature
//! table, the similarity scale and the salience table.
//!
//! A [`FeatureSystem`] is immutable once built. The built-in system is
//! [`FeatureSystem::kondrak`]; custom systems are loaded from JSON and
//! validated up front so that a malformed table never surfaces mid-alignment.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::AlignError;

/// An articulatory or acoustic dimension along which segments are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Syllabic,
    Place,
    Manner,
    Voice,
    Nasal,
    Retroflex,
    Lateral,
    Aspirated,
    Long,
    High,
    Back,
    Round,
}

impl Feature {
    pub const COUNT: usize = 12;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::Syllabic,
        Feature::Place,
        Feature::Manner,
        Feature::Voice,
        Feature::Nasal,
        Feature::Retroflex,
        Feature::Lateral,
        Feature::Aspirated,
        Feature::Long,
        Feature::High,
        Feature::Back,
        Feature::Round,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Syllabic => "syllabic",
            Feature::Place => "place",
            Feature::Manner => "manner",
            Feature::Voice => "voice",
            Feature::Nasal => "nasal",
            Feature::Retroflex => "retroflex",
            Feature::Lateral => "lateral",
            Feature::Aspirated => "aspirated",
            Feature::Long => "long",
            Feature::High => "high",
            Feature::Back => "back",
            Feature::Round => "round",
        }
    }

    /// Whether `value` lies in this feature's range.
    pub fn accepts(self, value: FeatureValue) -> bool {
        use FeatureValue::*;
        match self {
            Feature::Place => matches!(
                value,
                Bilabial
                    | Labiodental
                    | Dental
                    | Alveolar
                    | RetroflexPlace
                    | PalatoAlveolar
                    | Palatal
                    | Velar
                    | Uvular
                    | Pharyngeal
                    | Glottal
            ),
            Feature::Manner => matches!(
                value,
                Stop | Affricate | Fricative | Approximant | HighVowel | MidVowel | LowVowel
            ),
            Feature::High => matches!(value, High | Mid | Low),
            Feature::Back => matches!(value, Front | Central | Back),
            _ => matches!(value, Plus | Minus),
        }
    }

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| AlignError::configuration(format!("unknown feature name {:?}", s)))
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A categorical value of a feature. Values are shared across features only
/// where the published matrix shares them (`plus`/`minus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureValue {
    Bilabial,
    Labiodental,
    Dental,
    Alveolar,
    RetroflexPlace,
    PalatoAlveolar,
    Palatal,
    Velar,
    Uvular,
    Pharyngeal,
    Glottal,
    Stop,
    Affricate,
    Fricative,
    Approximant,
    HighVowel,
    MidVowel,
    LowVowel,
    High,
    Mid,
    Low,
    Front,
    Central,
    Back,
    Plus,
    Minus,
}

impl FeatureValue {
    pub const COUNT: usize = 26;

    pub const ALL: [FeatureValue; FeatureValue::COUNT] = [
        FeatureValue::Bilabial,
        FeatureValue::Labiodental,
        FeatureValue::Dental,
        FeatureValue::Alveolar,
        FeatureValue::RetroflexPlace,
        FeatureValue::PalatoAlveolar,
        FeatureValue::Palatal,
        FeatureValue::Velar,
        FeatureValue::Uvular,
        FeatureValue::Pharyngeal,
        FeatureValue::Glottal,
        FeatureValue::Stop,
        FeatureValue::Affricate,
        FeatureValue::Fricative,
        FeatureValue::Approximant,
        FeatureValue::HighVowel,
        FeatureValue::MidVowel,
        FeatureValue::LowVowel,
        FeatureValue::High,
        FeatureValue::Mid,
        FeatureValue::Low,
        FeatureValue::Front,
        FeatureValue::Central,
        FeatureValue::Back,
        FeatureValue::Plus,
        FeatureValue::Minus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureValue::Bilabial => "bilabial",
            FeatureValue::Labiodental => "labiodental",
            FeatureValue::Dental => "dental",
            FeatureValue::Alveolar => "alveolar",
            FeatureValue::RetroflexPlace => "retroflex",
            FeatureValue::PalatoAlveolar => "palato-alveolar",
            FeatureValue::Palatal => "palatal",
            FeatureValue::Velar => "velar",
            FeatureValue::Uvular => "uvular",
            FeatureValue::Pharyngeal => "pharyngeal",
            FeatureValue::Glottal => "glottal",
            FeatureValue::Stop => "stop",
            FeatureValue::Affricate => "affricate",
            FeatureValue::Fricative => "fricative",
            FeatureValue::Approximant => "approximant",
            FeatureValue::HighVowel => "high vowel",
            FeatureValue::MidVowel => "mid vowel",
            FeatureValue::LowVowel => "low vowel",
            FeatureValue::High => "high",
            FeatureValue::Mid => "mid",
            FeatureValue::Low => "low",
            FeatureValue::Front => "front",
            FeatureValue::Central => "central",
            FeatureValue::Back => "back",
            FeatureValue::Plus => "plus",
            FeatureValue::Minus => "minus",
        }
    }

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureValue {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureValue::ALL
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| {
                AlignError::configuration(format!("unknown feature value {:?}", s))
            })
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Fixed-shape feature record for one segment, keyed by [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureVector {
    values: [Option<FeatureValue>; Feature::COUNT],
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: Feature, value: FeatureValue) -> Self {
        self.set(feature, value);
        self
    }

    pub fn set(&mut self, feature: Feature, value: FeatureValue) {
        self.values[feature.index()] = Some(value);
    }

    #[inline]
    pub fn get(&self, feature: Feature) -> Option<FeatureValue> {
        self.values[feature.index()]
    }

    /// Defined (feature, value) pairs in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, FeatureValue)> + '_ {
        Feature::ALL
            .iter()
            .filter_map(move |&f| self.get(f).map(|v| (f, v)))
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Maps feature values to numeric closeness.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimilarityScale {
    values: [Option<f64>; FeatureValue::COUNT],
}

impl SimilarityScale {
    /// Multivalued feature scale from Kondrak (2002), flattened over all features.
    pub fn kondrak() -> Self {
        use FeatureValue::*;
        let mut scale = Self::default();
        for (value, sim) in [
            (Bilabial, 1.0),
            (Labiodental, 0.95),
            (Dental, 0.9),
            (Alveolar, 0.85),
            (RetroflexPlace, 0.8),
            (PalatoAlveolar, 0.75),
            (Palatal, 0.7),
            (Velar, 0.6),
            (Uvular, 0.5),
            (Pharyngeal, 0.3),
            (Glottal, 0.1),
            (Stop, 1.0),
            (Affricate, 0.9),
            (Fricative, 0.8),
            (Approximant, 0.6),
            (HighVowel, 0.4),
            (MidVowel, 0.2),
            (LowVowel, 0.0),
            (High, 1.0),
            (Mid, 0.5),
            (Low, 0.0),
            (Front, 1.0),
            (Central, 0.5),
            (Back, 0.0),
            (Plus, 1.0),
            (Minus, 0.0),
        ] {
            scale.set(value, sim);
        }
        scale
    }

    pub fn set(&mut self, value: FeatureValue, similarity: f64) {
        self.values[value.index()] = Some(similarity);
    }

    pub fn get(&self, value: FeatureValue) -> Option<f64> {
        self.values[value.index()]
    }

    /// Numeric closeness of `value`; fails if the scale does not cover it.
    #[inline]
    pub fn similarity(&self, value: FeatureValue) -> Result<f64, AlignError> {
        self.get(value).ok_or_else(|| {
            AlignError::configuration(format!("similarity scale has no entry for {:?}", value.name()))
        })
    }
}

/// Per-feature weights used in the feature distance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Salience {
    weights: [Option<u32>; Feature::COUNT],
}

impl Salience {
    /// Relative weights of phonetic features (Kondrak 2002).
    pub fn kondrak() -> Self {
        let mut salience = Self::default();
        for (feature, weight) in [
            (Feature::Syllabic, 5),
            (Feature::Place, 40),
            (Feature::Manner, 50),
            (Feature::Voice, 10),
            (Feature::Nasal, 10),
            (Feature::Retroflex, 10),
            (Feature::Lateral, 10),
            (Feature::Aspirated, 5),
            (Feature::Long, 1),
            (Feature::High, 5),
            (Feature::Back, 5),
            (Feature::Round, 5),
        ] {
            salience.set(feature, weight);
        }
        salience
    }

    pub fn set(&mut self, feature: Feature, weight: u32) {
        self.weights[feature.index()] = Some(weight);
    }

    pub fn get(&self, feature: Feature) -> Option<u32> {
        self.weights[feature.index()]
    }

    #[inline]
    pub fn weight(&self, feature: Feature) -> Result<u32, AlignError> {
        self.get(feature).ok_or_else(|| {
            AlignError::configuration(format!("salience table has no weight for {:?}", feature.name()))
        })
    }
}

/// Serialized form of a feature system. All names are plain strings so that a
/// malformed file is reported with the offending name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSystemDef {
    pub name: String,
    pub similarity: BTreeMap<String, f64>,
    pub salience: BTreeMap<String, u32>,
    pub consonant_features: Vec<String>,
    pub vowel_features: Vec<String>,
    pub consonants: Vec<String>,
    pub segments: BTreeMap<String, BTreeMap<String, String>>,
}

/// Feature table, consonant set, similarity scale, salience table and
/// relevant-feature sets of one transcription convention.
#[derive(Debug, Clone)]
pub struct FeatureSystem {
    pub(crate) name: String,
    pub(crate) entries: HashMap<char, FeatureVector>,
    pub(crate) consonants: HashSet<char>,
    pub(crate) similarity: SimilarityScale,
    pub(crate) salience: Salience,
    pub(crate) consonant_features: Vec<Feature>,
    pub(crate) vowel_features: Vec<Feature>,
}

impl FeatureSystem {
    /// Assemble and validate a feature system.
    pub fn new(
        name: impl Into<String>,
        entries: HashMap<char, FeatureVector>,
        consonants: HashSet<char>,
        similarity: SimilarityScale,
        salience: Salience,
        consonant_features: Vec<Feature>,
        vowel_features: Vec<Feature>,
    ) -> Result<Self, AlignError> {
        let system = Self {
            name: name.into(),
            entries,
            consonants,
            similarity,
            salience,
            consonant_features,
            vowel_features,
        };
        system.validate()?;
        Ok(system)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature record of `segment`.
    #[inline]
    pub fn features(&self, segment: char) -> Result<&FeatureVector, AlignError> {
        self.entries
            .get(&segment)
            .ok_or_else(|| AlignError::unknown_segment(segment))
    }

    #[inline]
    pub fn similarity(&self, value: FeatureValue) -> Result<f64, AlignError> {
        self.similarity.similarity(value)
    }

    #[inline]
    pub fn weight(&self, feature: Feature) -> Result<u32, AlignError> {
        self.salience.weight(feature)
    }

    pub fn contains(&self, segment: char) -> bool {
        self.entries.contains_key(&segment)
    }

    /// All known segments, sorted.
    pub fn segments(&self) -> Vec<char> {
        let mut segments: Vec<char> = self.entries.keys().copied().collect();
        segments.sort_unstable();
        segments
    }

    pub fn consonant_features(&self) -> &[Feature] {
        &self.consonant_features
    }

    pub fn vowel_features(&self) -> &[Feature] {
        &self.vowel_features
    }

    /// Check that every comparison the aligner can make is fully defined.
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.consonant_features.is_empty() || self.vowel_features.is_empty() {
            return Err(AlignError::configuration(
                "relevant feature sets must not be empty",
            ));
        }

        for &feature in self.consonant_features.iter().chain(&self.vowel_features) {
            match self.salience.get(feature) {
                Some(w) if w > 0 => {}
                Some(_) => {
                    return Err(AlignError::configuration(format!(
                        "salience of {:?} must be positive",
                        feature.name()
                    )))
                }
                None => {
                    return Err(AlignError::configuration(format!(
                        "salience table has no weight for {:?}",
                        feature.name()
                    )))
                }
            }
        }

        let mut consonants: Vec<char> = self.consonants.iter().copied().collect();
        consonants.sort_unstable();
        for segment in consonants {
            if !self.entries.contains_key(&segment) {
                return Err(AlignError::configuration(format!(
                    "consonant {:?} has no feature table entry",
                    segment
                )));
            }
        }

        for segment in self.segments() {
            let vector = &self.entries[&segment];
            for (feature, value) in vector.iter() {
                if !feature.accepts(value) {
                    return Err(AlignError::configuration(format!(
                        "segment {:?}: {:?} is not a value of {:?}",
                        segment,
                        value.name(),
                        feature.name()
                    )));
                }
                match self.similarity.get(value) {
                    Some(sim) if sim.is_finite() => {}
                    _ => {
                        return Err(AlignError::configuration(format!(
                            "segment {:?}: value {:?} has no finite similarity",
                            segment,
                            value.name()
                        )))
                    }
                }
            }

            let required: &[Feature] = if self.consonants.contains(&segment) {
                &self.consonant_features
            } else {
                // Vowels meet consonants too, so they need both sets.
                &self.vowel_features
            };
            for &feature in self.consonant_features.iter().chain(required) {
                if vector.get(feature).is_none() {
                    return Err(AlignError::configuration(format!(
                        "segment {:?} lacks feature {:?}",
                        segment,
                        feature.name()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Build from the serialized form, rejecting unknown names.
    pub fn from_def(def: &FeatureSystemDef) -> Result<Self, AlignError> {
        let mut similarity = SimilarityScale::default();
        for (name, &sim) in &def.similarity {
            similarity.set(name.parse()?, sim);
        }

        let mut salience = Salience::default();
        for (name, &weight) in &def.salience {
            salience.set(name.parse()?, weight);
        }

        let consonant_features = parse_features(&def.consonant_features)?;
        let vowel_features = parse_features(&def.vowel_features)?;

        let mut consonants = HashSet::with_capacity(def.consonants.len());
        for key in &def.consonants {
            consonants.insert(single_char(key)?);
        }

        let mut entries = HashMap::with_capacity(def.segments.len());
        for (key, features) in &def.segments {
            let segment = single_char(key)?;
            let mut vector = FeatureVector::new();
            for (feature, value) in features {
                vector.set(feature.parse()?, value.parse()?);
            }
            entries.insert(segment, vector);
        }

        Self::new(
            def.name.clone(),
            entries,
            consonants,
            similarity,
            salience,
            consonant_features,
            vowel_features,
        )
    }

    /// Serialized form of this system.
    pub fn to_def(&self) -> FeatureSystemDef {
        let similarity = FeatureValue::ALL
            .iter()
            .filter_map(|&v| self.similarity.get(v).map(|s| (v.name().to_string(), s)))
            .collect();
        let salience = Feature::ALL
            .iter()
            .filter_map(|&f| self.salience.get(f).map(|w| (f.name().to_string(), w)))
            .collect();
        let mut consonants: Vec<char> = self.consonants.iter().copied().collect();
        consonants.sort_unstable();
        let segments = self
            .entries
            .iter()
            .map(|(seg, vector)| {
                let features = vector
                    .iter()
                    .map(|(f, v)| (f.name().to_string(), v.name().to_string()))
                    .collect();
                (seg.to_string(), features)
            })
            .collect();

        FeatureSystemDef {
            name: self.name.clone(),
            similarity,
            salience,
            consonant_features: self.consonant_features.iter().map(|f| f.name().to_string()).collect(),
            vowel_features: self.vowel_features.iter().map(|f| f.name().to_string()).collect(),
            consonants: consonants.iter().map(|c| c.to_string()).collect(),
            segments,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AlignError> {
        let def: FeatureSystemDef =
            serde_json::from_str(json).map_err(|e| AlignError::json("parse feature system", e))?;
        Self::from_def(&def)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AlignError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignError::io("read feature system", e))?;
        Self::from_json_str(&data)
    }

    pub fn to_json_string(&self) -> Result<String, AlignError> {
        serde_json::to_string_pretty(&self.to_def())
            .map_err(|e| AlignError::json("serialize feature system", e))
    }
}

impl Default for FeatureSystem {
    fn default() -> Self {
        Self::kondrak()
    }
}

fn parse_features(names: &[String]) -> Result<Vec<Feature>, AlignError> {
    names.iter().map(|n| n.parse()).collect()
}

fn single_char(key: &str) -> Result<char, AlignError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(AlignError::configuration(format!(
            "segment {:?} must be exactly one Unicode scalar value",
            key
        ))),
    }
}
