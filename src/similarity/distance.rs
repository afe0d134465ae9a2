//! Feature-weighted phonetic distance.
//!
//! Phoneme distance accumulates mismatch cost over four independent
//! dimensions, weighted by how strongly each one shapes perceived
//! similarity: manner of articulation 0.40, place 0.35, voicing 0.15, and
//! a catch-all for remaining tags (vowel height, backness, rounding, ad
//! hoc marks) 0.10. Manner and place count as matching when the two
//! phonemes share at least one tag in the dimension; voicing compares the
//! single voicing tag for equality; the remainder contributes its weight
//! scaled by one minus the Jaccard overlap.
//!
//! Sequence distance is the classic edit-distance recurrence over phoneme
//! tokens, with substitution cost taken from the phoneme metric and a
//! fixed gap cost for insertions and deletions.

use crate::features::FeatureModel;

/// Insertion/deletion cost in the weighted edit distance.
pub const GAP_COST: f64 = 0.6;

const TYPE_FEATURES: &[&str] = &["consonant", "vowel"];

const MANNER_FEATURES: &[&str] = &[
    "stop",
    "fricative",
    "nasal",
    "trill",
    "tap",
    "lateral",
    "approximant",
    "affricate",
];

const PLACE_FEATURES: &[&str] = &[
    "bilabial",
    "labiodental",
    "dental",
    "alveolar",
    "postalveolar",
    "retroflex",
    "alveolopalatal",
    "palatal",
    "velar",
    "uvular",
    "pharyngeal",
    "glottal",
];

const VOICING_FEATURES: &[&str] = &["voiced", "voiceless"];

fn is_core_feature(feature: &str) -> bool {
    TYPE_FEATURES.contains(&feature)
        || MANNER_FEATURES.contains(&feature)
        || PLACE_FEATURES.contains(&feature)
        || VOICING_FEATURES.contains(&feature)
}

/// Distance between two phonemes in [0, 1].
///
/// Identical symbols are at distance 0. If either symbol is unknown to
/// the model the metric degenerates to exact-string matching, so the
/// distance is 1. Known phonemes of different types (consonant against
/// vowel) are maximally distant; otherwise the weighted dimension costs
/// apply.
///
/// The metric is symmetric and reflexive.
///
/// # Examples
///
/// ```rust
/// use soundlaw::features::FeatureModel;
/// use soundlaw::similarity::phoneme_distance;
///
/// let model = FeatureModel::global();
/// assert_eq!(phoneme_distance(model, "p", "p"), 0.0);
/// assert_eq!(phoneme_distance(model, "p", "a"), 1.0);
/// // Two voiceless stops differing only in place stay close.
/// assert!(phoneme_distance(model, "p", "k") < 0.5);
/// ```
pub fn phoneme_distance(model: &FeatureModel, a: &str, b: &str) -> f64 {
    if a == b {
        return 0.0;
    }
    let (Some(fa), Some(fb)) = (model.features_of(a), model.features_of(b)) else {
        return 1.0;
    };

    let type_a = fa.iter().copied().find(|f| TYPE_FEATURES.contains(f));
    let type_b = fb.iter().copied().find(|f| TYPE_FEATURES.contains(f));
    if type_a != type_b {
        return 1.0;
    }

    let mut diff = 0.0;
    let mut total = 0.0;

    let manner_match = fa
        .iter()
        .copied()
        .filter(|f| MANNER_FEATURES.contains(f))
        .any(|f| fb.contains(&f));
    if !manner_match {
        diff += 0.4;
    }
    total += 0.4;

    let place_match = fa
        .iter()
        .copied()
        .filter(|f| PLACE_FEATURES.contains(f))
        .any(|f| fb.contains(&f));
    if !place_match {
        diff += 0.35;
    }
    total += 0.35;

    let voice_a = fa.iter().copied().find(|f| VOICING_FEATURES.contains(f));
    let voice_b = fb.iter().copied().find(|f| VOICING_FEATURES.contains(f));
    if voice_a != voice_b {
        diff += 0.15;
    }
    total += 0.15;

    let other_a: Vec<&str> = fa.iter().copied().filter(|f| !is_core_feature(f)).collect();
    let other_b: Vec<&str> = fb.iter().copied().filter(|f| !is_core_feature(f)).collect();
    let common = other_a.iter().filter(|f| other_b.contains(*f)).count();
    let union = other_a.len() + other_b.iter().filter(|f| !other_a.contains(*f)).count();
    let overlap = if union > 0 {
        common as f64 / union as f64
    } else {
        1.0
    };
    diff += (1.0 - overlap) * 0.1;
    total += 0.1;

    (diff / total).min(1.0)
}

/// Weighted edit distance between two phoneme-token sequences.
///
/// A full (m+1)×(n+1) dynamic-programming table: substitution costs
/// [`phoneme_distance`], insertion and deletion cost [`GAP_COST`] each.
/// The distance from an n-token sequence to the empty sequence is
/// `n × GAP_COST`.
pub fn weighted_edit_distance(model: &FeatureModel, a: &[&str], b: &[&str]) -> f64 {
    let m = a.len();
    let n = b.len();
    let mut dp = vec![vec![0.0f64; n + 1]; m + 1];

    for (i, row) in dp.iter_mut().enumerate().skip(1) {
        row[0] = i as f64 * GAP_COST;
    }
    for j in 1..=n {
        dp[0][j] = j as f64 * GAP_COST;
    }

    for i in 1..=m {
        for j in 1..=n {
            let substitute = dp[i - 1][j - 1] + phoneme_distance(model, a[i - 1], b[j - 1]);
            let delete = dp[i - 1][j] + GAP_COST;
            let insert = dp[i][j - 1] + GAP_COST;
            dp[i][j] = substitute.min(delete).min(insert);
        }
    }

    dp[m][n]
}

/// Edit distance normalized to [0, 1] by the longer sequence's all-gaps
/// cost. Two empty sequences are at distance 0.
///
/// The raw ratio can exceed 1 when expensive substitutions beat the
/// all-gaps alignment, so the result is clamped.
pub fn normalized_distance(model: &FeatureModel, a: &[&str], b: &[&str]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 0.0;
    }
    (weighted_edit_distance(model, a, b) / (max_len as f64 * GAP_COST)).min(1.0)
}
