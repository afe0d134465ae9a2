//! Fuzzy lexicon search by phonetic similarity.

use crate::features::FeatureModel;
use crate::tokenizer::tokenize;

use super::distance::normalized_distance;

/// Default maximum normalized distance for [`fuzzy_search`].
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.6;

/// Anything carrying a phonetic transcription that can be searched.
///
/// The seam between this crate and whatever shape the caller's lexicon
/// takes; implementors only need to expose the transcription string.
pub trait Transcribed {
    /// The phonetic transcription, or an empty string when the entry has
    /// none (such entries are skipped by the search).
    fn transcription(&self) -> &str;
}

/// A minimal searchable lexicon entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LexiconEntry {
    /// Stable identifier.
    pub entry_id: String,
    /// Romanized headword.
    pub romanization: String,
    /// IPA transcription.
    pub phonetic_ipa: String,
}

impl Transcribed for LexiconEntry {
    fn transcription(&self) -> &str {
        &self.phonetic_ipa
    }
}

/// One search result: an entry and its normalized distance to the query.
#[derive(Debug, Clone)]
pub struct SearchHit<'a, E> {
    /// The matched lexicon entry.
    pub entry: &'a E,
    /// Normalized phonetic distance to the query, in [0, 1].
    pub distance: f64,
}

/// Rank lexicon entries by phonetic similarity to a query.
///
/// The query is tokenized once; every entry with a non-empty
/// transcription is tokenized against the same inventory and kept when
/// its normalized distance is at most `threshold`. Results come back
/// sorted ascending by distance; the sort is stable, so ties keep
/// lexicon order. An empty or whitespace query, or one that tokenizes to
/// nothing, returns no results without scanning the lexicon.
///
/// # Examples
///
/// ```rust
/// use soundlaw::features::FeatureModel;
/// use soundlaw::similarity::{fuzzy_search, LexiconEntry, DEFAULT_SEARCH_THRESHOLD};
///
/// let lexicon = vec![
///     LexiconEntry {
///         entry_id: "1".to_string(),
///         romanization: "kata".to_string(),
///         phonetic_ipa: "kata".to_string(),
///     },
///     LexiconEntry {
///         entry_id: "2".to_string(),
///         romanization: "gada".to_string(),
///         phonetic_ipa: "ɡada".to_string(),
///     },
/// ];
/// let inventory = ["k", "ɡ", "t", "d", "a"];
///
/// let hits = fuzzy_search(
///     FeatureModel::global(),
///     "kata",
///     &lexicon,
///     &inventory,
///     DEFAULT_SEARCH_THRESHOLD,
/// );
/// assert_eq!(hits[0].entry.entry_id, "1");
/// assert_eq!(hits[0].distance, 0.0);
/// ```
pub fn fuzzy_search<'a, E: Transcribed, S: AsRef<str>>(
    model: &FeatureModel,
    query: &str,
    entries: &'a [E],
    inventory: &[S],
    threshold: f64,
) -> Vec<SearchHit<'a, E>> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let query_tokens = tokenize(query, inventory);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for entry in entries {
        let transcription = entry.transcription();
        if transcription.is_empty() {
            continue;
        }
        let entry_tokens = tokenize(transcription, inventory);
        if entry_tokens.is_empty() {
            continue;
        }
        let distance = normalized_distance(model, &query_tokens, &entry_tokens);
        if distance <= threshold {
            hits.push(SearchHit { entry, distance });
        }
    }

    hits.sort_by(|x, y| x.distance.total_cmp(&y.distance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, ipa: &str) -> LexiconEntry {
        LexiconEntry {
            entry_id: id.to_string(),
            romanization: id.to_string(),
            phonetic_ipa: ipa.to_string(),
        }
    }

    fn inventory() -> Vec<&'static str> {
        FeatureModel::global().symbols().collect()
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let lexicon = vec![entry("far", "tuki"), entry("exact", "kata"), entry("near", "ɡata")];
        let hits = fuzzy_search(
            FeatureModel::global(),
            "kata",
            &lexicon,
            &inventory(),
            DEFAULT_SEARCH_THRESHOLD,
        );
        assert_eq!(hits[0].entry.entry_id, "exact");
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn test_results_sorted_ascending_and_thresholded() {
        let lexicon = vec![
            entry("a", "kata"),
            entry("b", "ɡada"),
            entry("c", "nunu"),
            entry("d", "katan"),
        ];
        let hits = fuzzy_search(
            FeatureModel::global(),
            "kata",
            &lexicon,
            &inventory(),
            DEFAULT_SEARCH_THRESHOLD,
        );
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        for hit in &hits {
            assert!(hit.distance <= DEFAULT_SEARCH_THRESHOLD);
        }
        assert!(!hits.iter().any(|h| h.entry.entry_id == "c"));
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let lexicon = vec![entry("a", "kata")];
        let hits = fuzzy_search(
            FeatureModel::global(),
            "   ",
            &lexicon,
            &inventory(),
            DEFAULT_SEARCH_THRESHOLD,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_entries_without_transcription_are_skipped() {
        let lexicon = vec![entry("silent", ""), entry("spoken", "kata")];
        let hits = fuzzy_search(
            FeatureModel::global(),
            "kata",
            &lexicon,
            &inventory(),
            DEFAULT_SEARCH_THRESHOLD,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.entry_id, "spoken");
    }

    #[test]
    fn test_zero_threshold_keeps_exact_matches_only() {
        let lexicon = vec![entry("a", "kata"), entry("b", "ɡata")];
        let hits = fuzzy_search(FeatureModel::global(), "kata", &lexicon, &inventory(), 0.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.entry_id, "a");
    }

    #[test]
    fn test_custom_transcribed_implementation() {
        struct Row {
            ipa: String,
        }
        impl Transcribed for Row {
            fn transcription(&self) -> &str {
                &self.ipa
            }
        }
        let rows = vec![Row {
            ipa: "mata".to_string(),
        }];
        let hits = fuzzy_search(
            FeatureModel::global(),
            "mata",
            &rows,
            &inventory(),
            DEFAULT_SEARCH_THRESHOLD,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, 0.0);
    }
}
