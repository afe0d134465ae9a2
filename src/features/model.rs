//! The built-in phonological feature model.
//!
//! Maps IPA symbols to distinctive feature tags. The table is static data;
//! its declaration order is the model's canonical enumeration order, which
//! tie-breaking in [`FeatureModel::resolve_by_features`] and the result
//! order of [`FeatureModel::matching_phonemes`] both depend on.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::index::FeatureIndex;

/// Distinctive feature tags for every phoneme the model knows about.
///
/// Consonants carry `consonant`, a manner tag, a place tag, and a voicing
/// tag. Vowels carry `vowel`, a height tag, a backness tag, and a rounding
/// tag. Declaration order is significant and must stay stable.
pub(crate) const PHONEME_FEATURES: &[(&str, &[&str])] = &[
    // stops
    ("p", &["consonant", "stop", "bilabial", "voiceless"]),
    ("b", &["consonant", "stop", "bilabial", "voiced"]),
    ("t", &["consonant", "stop", "alveolar", "voiceless"]),
    ("d", &["consonant", "stop", "alveolar", "voiced"]),
    ("ʈ", &["consonant", "stop", "retroflex", "voiceless"]),
    ("ɖ", &["consonant", "stop", "retroflex", "voiced"]),
    ("c", &["consonant", "stop", "palatal", "voiceless"]),
    ("ɟ", &["consonant", "stop", "palatal", "voiced"]),
    ("k", &["consonant", "stop", "velar", "voiceless"]),
    ("ɡ", &["consonant", "stop", "velar", "voiced"]),
    ("g", &["consonant", "stop", "velar", "voiced"]),
    ("q", &["consonant", "stop", "uvular", "voiceless"]),
    ("ɢ", &["consonant", "stop", "uvular", "voiced"]),
    ("ʔ", &["consonant", "stop", "glottal", "voiceless"]),
    // nasals
    ("m", &["consonant", "nasal", "bilabial", "voiced"]),
    ("ɱ", &["consonant", "nasal", "labiodental", "voiced"]),
    ("n", &["consonant", "nasal", "alveolar", "voiced"]),
    ("ɳ", &["consonant", "nasal", "retroflex", "voiced"]),
    ("ɲ", &["consonant", "nasal", "palatal", "voiced"]),
    ("ŋ", &["consonant", "nasal", "velar", "voiced"]),
    ("ɴ", &["consonant", "nasal", "uvular", "voiced"]),
    // trills
    ("r", &["consonant", "trill", "alveolar", "voiced"]),
    ("ʀ", &["consonant", "trill", "uvular", "voiced"]),
    ("ʙ", &["consonant", "trill", "bilabial", "voiced"]),
    // taps
    ("ɾ", &["consonant", "tap", "alveolar", "voiced"]),
    ("ɽ", &["consonant", "tap", "retroflex", "voiced"]),
    // fricatives
    ("ɸ", &["consonant", "fricative", "bilabial", "voiceless"]),
    ("β", &["consonant", "fricative", "bilabial", "voiced"]),
    ("f", &["consonant", "fricative", "labiodental", "voiceless"]),
    ("v", &["consonant", "fricative", "labiodental", "voiced"]),
    ("θ", &["consonant", "fricative", "dental", "voiceless"]),
    ("ð", &["consonant", "fricative", "dental", "voiced"]),
    ("s", &["consonant", "fricative", "alveolar", "voiceless"]),
    ("z", &["consonant", "fricative", "alveolar", "voiced"]),
    ("ʃ", &["consonant", "fricative", "postalveolar", "voiceless"]),
    ("ʒ", &["consonant", "fricative", "postalveolar", "voiced"]),
    ("ʂ", &["consonant", "fricative", "retroflex", "voiceless"]),
    ("ʐ", &["consonant", "fricative", "retroflex", "voiced"]),
    ("ɕ", &["consonant", "fricative", "alveolopalatal", "voiceless"]),
    ("ʑ", &["consonant", "fricative", "alveolopalatal", "voiced"]),
    ("ç", &["consonant", "fricative", "palatal", "voiceless"]),
    ("ʝ", &["consonant", "fricative", "palatal", "voiced"]),
    ("x", &["consonant", "fricative", "velar", "voiceless"]),
    ("ɣ", &["consonant", "fricative", "velar", "voiced"]),
    ("χ", &["consonant", "fricative", "uvular", "voiceless"]),
    ("ʁ", &["consonant", "fricative", "uvular", "voiced"]),
    ("ħ", &["consonant", "fricative", "pharyngeal", "voiceless"]),
    ("ʕ", &["consonant", "fricative", "pharyngeal", "voiced"]),
    ("h", &["consonant", "fricative", "glottal", "voiceless"]),
    ("ɦ", &["consonant", "fricative", "glottal", "voiced"]),
    // approximants
    ("ʋ", &["consonant", "approximant", "labiodental", "voiced"]),
    ("ɹ", &["consonant", "approximant", "alveolar", "voiced"]),
    ("ɻ", &["consonant", "approximant", "retroflex", "voiced"]),
    ("j", &["consonant", "approximant", "palatal", "voiced"]),
    ("ɰ", &["consonant", "approximant", "velar", "voiced"]),
    ("w", &["consonant", "approximant", "labiovelar", "voiced"]),
    // laterals
    ("l", &["consonant", "lateral", "alveolar", "voiced"]),
    ("ɭ", &["consonant", "lateral", "retroflex", "voiced"]),
    ("ʎ", &["consonant", "lateral", "palatal", "voiced"]),
    ("ʟ", &["consonant", "lateral", "velar", "voiced"]),
    // lateral fricatives
    ("ɬ", &["consonant", "lateral_fricative", "alveolar", "voiceless"]),
    ("ɮ", &["consonant", "lateral_fricative", "alveolar", "voiced"]),
    // affricates
    ("ts", &["consonant", "affricate", "alveolar", "voiceless"]),
    ("dz", &["consonant", "affricate", "alveolar", "voiced"]),
    ("tʃ", &["consonant", "affricate", "postalveolar", "voiceless"]),
    ("dʒ", &["consonant", "affricate", "postalveolar", "voiced"]),
    ("tɕ", &["consonant", "affricate", "alveolopalatal", "voiceless"]),
    ("dʑ", &["consonant", "affricate", "alveolopalatal", "voiced"]),
    // vowels
    ("i", &["vowel", "close", "front", "unrounded"]),
    ("y", &["vowel", "close", "front", "rounded"]),
    ("ɨ", &["vowel", "close", "central", "unrounded"]),
    ("ʉ", &["vowel", "close", "central", "rounded"]),
    ("ɯ", &["vowel", "close", "back", "unrounded"]),
    ("u", &["vowel", "close", "back", "rounded"]),
    ("ɪ", &["vowel", "near_close", "front", "unrounded"]),
    ("ʏ", &["vowel", "near_close", "front", "rounded"]),
    ("ʊ", &["vowel", "near_close", "back", "rounded"]),
    ("e", &["vowel", "close_mid", "front", "unrounded"]),
    ("ø", &["vowel", "close_mid", "front", "rounded"]),
    ("ɘ", &["vowel", "close_mid", "central", "unrounded"]),
    ("ɵ", &["vowel", "close_mid", "central", "rounded"]),
    ("ɤ", &["vowel", "close_mid", "back", "unrounded"]),
    ("o", &["vowel", "close_mid", "back", "rounded"]),
    ("ə", &["vowel", "mid", "central", "unrounded"]),
    ("ɛ", &["vowel", "open_mid", "front", "unrounded"]),
    ("œ", &["vowel", "open_mid", "front", "rounded"]),
    ("ɜ", &["vowel", "open_mid", "central", "unrounded"]),
    ("ɞ", &["vowel", "open_mid", "central", "rounded"]),
    ("ʌ", &["vowel", "open_mid", "back", "unrounded"]),
    ("ɔ", &["vowel", "open_mid", "back", "rounded"]),
    ("æ", &["vowel", "near_open", "front", "unrounded"]),
    ("ɐ", &["vowel", "near_open", "central", "unrounded"]),
    ("a", &["vowel", "open", "front", "unrounded"]),
    ("ɶ", &["vowel", "open", "front", "rounded"]),
    ("ä", &["vowel", "open", "central", "unrounded"]),
    ("ɑ", &["vowel", "open", "back", "unrounded"]),
    ("ɒ", &["vowel", "open", "back", "rounded"]),
];

/// Voicing partners: each obstruent paired with its voiced/voiceless
/// counterpart. Used by inventory balance checks.
const NATURAL_PAIRS: &[(&str, &str)] = &[
    ("p", "b"),
    ("b", "p"),
    ("t", "d"),
    ("d", "t"),
    ("k", "ɡ"),
    ("ɡ", "k"),
    ("g", "k"),
    ("q", "ɢ"),
    ("ɢ", "q"),
    ("c", "ɟ"),
    ("ɟ", "c"),
    ("ʈ", "ɖ"),
    ("ɖ", "ʈ"),
    ("f", "v"),
    ("v", "f"),
    ("s", "z"),
    ("z", "s"),
    ("ʃ", "ʒ"),
    ("ʒ", "ʃ"),
    ("ʂ", "ʐ"),
    ("ʐ", "ʂ"),
    ("ɕ", "ʑ"),
    ("ʑ", "ɕ"),
    ("θ", "ð"),
    ("ð", "θ"),
    ("ç", "ʝ"),
    ("ʝ", "ç"),
    ("x", "ɣ"),
    ("ɣ", "x"),
    ("χ", "ʁ"),
    ("ʁ", "χ"),
    ("ħ", "ʕ"),
    ("ʕ", "ħ"),
    ("h", "ɦ"),
    ("ɦ", "h"),
    ("ɸ", "β"),
    ("β", "ɸ"),
    ("ɬ", "ɮ"),
    ("ɮ", "ɬ"),
];

/// An immutable phoneme-to-features lookup structure.
///
/// Holds the phoneme entries in a fixed, documented enumeration order
/// (declaration order of the source table) together with a symbol lookup
/// map and a lazily built feature-to-phonemes inverted index.
///
/// The model is safe to share across threads: all data is read-only after
/// construction, and the index build is guarded by a [`OnceLock`] so
/// concurrent first lookups race only on who runs the (idempotent,
/// order-independent) build.
pub struct FeatureModel {
    entries: Vec<(&'static str, &'static [&'static str])>,
    by_symbol: FxHashMap<&'static str, usize>,
    pub(crate) index: OnceLock<FeatureIndex>,
}

static GLOBAL_MODEL: OnceLock<FeatureModel> = OnceLock::new();

impl FeatureModel {
    /// Build a model from a static entry table.
    ///
    /// Entry order becomes the model's canonical enumeration order. If a
    /// symbol appears more than once, the first occurrence wins.
    pub fn from_entries(entries: &[(&'static str, &'static [&'static str])]) -> Self {
        let entries: Vec<_> = entries.to_vec();
        let mut by_symbol = FxHashMap::default();
        for (i, (symbol, _)) in entries.iter().enumerate() {
            by_symbol.entry(*symbol).or_insert(i);
        }
        Self {
            entries,
            by_symbol,
            index: OnceLock::new(),
        }
    }

    /// Build the built-in IPA model.
    pub fn builtin() -> Self {
        Self::from_entries(PHONEME_FEATURES)
    }

    /// The process-wide shared built-in model.
    ///
    /// Constructed on first access and never mutated afterwards.
    pub fn global() -> &'static FeatureModel {
        GLOBAL_MODEL.get_or_init(FeatureModel::builtin)
    }

    /// Number of phonemes in the model.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the model contains no phonemes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All known symbols in enumeration order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(symbol, _)| *symbol)
    }

    /// Feature tags for a phoneme, or `None` if the symbol is unknown.
    pub fn features_of(&self, phoneme: &str) -> Option<&'static [&'static str]> {
        self.by_symbol
            .get(phoneme)
            .map(|&i| self.entries[i].1)
    }

    /// True if the model knows the symbol.
    pub fn contains(&self, phoneme: &str) -> bool {
        self.by_symbol.contains_key(phoneme)
    }

    pub(crate) fn entries(&self) -> &[(&'static str, &'static [&'static str])] {
        &self.entries
    }
}

impl Default for FeatureModel {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for FeatureModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureModel")
            .field("phonemes", &self.entries.len())
            .finish()
    }
}

/// The voicing partner of a phoneme, if it has one.
///
/// # Examples
///
/// ```rust
/// use soundlaw::features::natural_pair;
///
/// assert_eq!(natural_pair("p"), Some("b"));
/// assert_eq!(natural_pair("a"), None);
/// ```
pub fn natural_pair(phoneme: &str) -> Option<&'static str> {
    NATURAL_PAIRS
        .iter()
        .find(|(from, _)| *from == phoneme)
        .map(|(_, to)| *to)
}

/// A structural imbalance detected in a phoneme inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum InventoryWarning {
    /// An obstruent was selected without its voicing partner.
    MissingVoicingPair {
        /// The selected phoneme.
        phoneme: String,
        /// Its absent partner.
        pair: String,
    },
    /// The inventory has no consonants at all.
    NoConsonants,
    /// The inventory has unusually few consonants.
    FewConsonants {
        /// How many were selected.
        count: usize,
    },
    /// The inventory has no vowels at all.
    NoVowels,
    /// The inventory has unusually few vowels.
    FewVowels {
        /// How many were selected.
        count: usize,
    },
}

/// Check a selected inventory for structural imbalances.
///
/// Flags obstruents missing their voicing partner (each pair reported
/// once), and inventories with no or very few consonants or vowels.
/// Purely advisory; an empty result means no warnings, not correctness.
pub fn inventory_warnings<S: AsRef<str>>(consonants: &[S], vowels: &[S]) -> Vec<InventoryWarning> {
    let selected: Vec<&str> = consonants.iter().map(|s| s.as_ref()).collect();
    let mut warnings = Vec::new();
    let mut reported: Vec<&str> = Vec::new();

    for &phoneme in &selected {
        if let Some(pair) = natural_pair(phoneme) {
            if !selected.contains(&pair) && !reported.contains(&pair) {
                warnings.push(InventoryWarning::MissingVoicingPair {
                    phoneme: phoneme.to_string(),
                    pair: pair.to_string(),
                });
                reported.push(phoneme);
            }
        }
    }

    if consonants.is_empty() {
        warnings.push(InventoryWarning::NoConsonants);
    } else if consonants.len() < 6 {
        warnings.push(InventoryWarning::FewConsonants {
            count: consonants.len(),
        });
    }

    if vowels.is_empty() {
        warnings.push(InventoryWarning::NoVowels);
    } else if vowels.len() < 3 {
        warnings.push(InventoryWarning::FewVowels {
            count: vowels.len(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_of_known_phoneme() {
        let model = FeatureModel::builtin();
        assert_eq!(
            model.features_of("p"),
            Some(&["consonant", "stop", "bilabial", "voiceless"][..])
        );
        assert_eq!(
            model.features_of("a"),
            Some(&["vowel", "open", "front", "unrounded"][..])
        );
    }

    #[test]
    fn test_features_of_unknown_phoneme() {
        let model = FeatureModel::builtin();
        assert_eq!(model.features_of("xyz"), None);
        assert_eq!(model.features_of(""), None);
    }

    #[test]
    fn test_multi_character_symbols_present() {
        let model = FeatureModel::builtin();
        assert!(model.contains("tʃ"));
        assert!(model.contains("dz"));
    }

    #[test]
    fn test_every_phoneme_has_a_type_tag() {
        let model = FeatureModel::builtin();
        for symbol in model.symbols() {
            let features = model.features_of(symbol).unwrap();
            let is_consonant = features.contains(&"consonant");
            let is_vowel = features.contains(&"vowel");
            assert!(
                is_consonant ^ is_vowel,
                "{} must be exactly one of consonant/vowel",
                symbol
            );
        }
    }

    #[test]
    fn test_global_model_is_shared() {
        let a = FeatureModel::global();
        let b = FeatureModel::global();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_natural_pair_lookup() {
        assert_eq!(natural_pair("p"), Some("b"));
        assert_eq!(natural_pair("ʃ"), Some("ʒ"));
        assert_eq!(natural_pair("m"), None);
    }

    #[test]
    fn test_inventory_warnings_missing_pair() {
        let warnings = inventory_warnings(&["p", "t", "d", "k", "s", "m"], &["a", "i", "u"]);
        assert!(warnings.contains(&InventoryWarning::MissingVoicingPair {
            phoneme: "p".to_string(),
            pair: "b".to_string(),
        }));
    }

    #[test]
    fn test_inventory_warnings_empty_inventory() {
        let warnings = inventory_warnings::<&str>(&[], &[]);
        assert!(warnings.contains(&InventoryWarning::NoConsonants));
        assert!(warnings.contains(&InventoryWarning::NoVowels));
    }

    #[test]
    fn test_inventory_warnings_small_counts() {
        let warnings = inventory_warnings(&["p", "t"], &["a", "i"]);
        assert!(warnings.contains(&InventoryWarning::FewConsonants { count: 2 }));
        assert!(warnings.contains(&InventoryWarning::FewVowels { count: 2 }));
    }
}
