//! Phonetic similarity.
//!
//! A metric space over phonemes built from shared feature dimensions,
//! lifted to phoneme sequences with a weighted edit distance, and used to
//! rank lexicon entries by how close they sound to a query.
//!
//! - [`phoneme_distance`] - bounded [0, 1] distance between two phonemes
//! - [`weighted_edit_distance`] - dynamic-programming edit distance over
//!   token sequences where substitution cost is `phoneme_distance` and
//!   insertion/deletion cost is [`GAP_COST`]
//! - [`normalized_distance`] - the edit distance scaled by the longer
//!   sequence's all-gaps cost
//! - [`fuzzy_search`] - threshold-filtered, ascending-sorted lexicon
//!   lookup by normalized distance

pub mod distance;
pub mod search;

pub use distance::{normalized_distance, phoneme_distance, weighted_edit_distance, GAP_COST};
pub use search::{fuzzy_search, LexiconEntry, SearchHit, Transcribed, DEFAULT_SEARCH_THRESHOLD};
