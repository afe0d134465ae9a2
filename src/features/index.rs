//! Inverted feature index and feature-set expressions.
//!
//! The index maps each feature tag to the phonemes carrying it, in model
//! enumeration order. It is derived solely from the static model, so it is
//! built at most once per model and never invalidated; repeated calls to
//! [`FeatureModel::index`] return the same structure.

use rustc_hash::{FxHashMap, FxHashSet};

use super::model::FeatureModel;

/// Feature tag to phoneme postings, phoneme ids in model enumeration order.
#[derive(Debug)]
pub struct FeatureIndex {
    postings: FxHashMap<&'static str, Vec<usize>>,
}

impl FeatureIndex {
    fn build(model: &FeatureModel) -> Self {
        let mut postings: FxHashMap<&'static str, Vec<usize>> = FxHashMap::default();
        for (id, &(_, features)) in model.entries().iter().enumerate() {
            for &feature in features {
                postings.entry(feature).or_default().push(id);
            }
        }
        Self { postings }
    }

    /// Phoneme ids carrying a feature, or `None` for a tag the model never
    /// uses.
    pub(crate) fn phonemes_with(&self, feature: &str) -> Option<&[usize]> {
        self.postings.get(feature).map(Vec::as_slice)
    }
}

/// A conjunction of feature requirements.
///
/// A phoneme matches when it carries every `positive` feature and none of
/// the `negative` ones. A phoneme absent from the model never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct FeatureExpression {
    /// Features that must all be present.
    pub positive: Vec<String>,
    /// Features that must all be absent.
    pub negative: Vec<String>,
}

impl FeatureExpression {
    /// Parse a bracketed expression such as `"[+voiced, -stop]"`.
    ///
    /// Surrounding brackets are optional. Terms are comma-separated; a `+`
    /// prefix (or no prefix) marks a positive requirement, `-` a negative
    /// one. Empty terms are ignored, so `""` parses to the empty
    /// expression.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use soundlaw::features::FeatureExpression;
    ///
    /// let expr = FeatureExpression::parse("[+voiced, -stop]");
    /// assert_eq!(expr.positive, vec!["voiced"]);
    /// assert_eq!(expr.negative, vec!["stop"]);
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut expr = Self::default();
        let cleaned = text
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']');
        for part in cleaned.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some(name) = part.strip_prefix('+') {
                expr.positive.push(name.to_string());
            } else if let Some(name) = part.strip_prefix('-') {
                expr.negative.push(name.to_string());
            } else {
                expr.positive.push(part.to_string());
            }
        }
        expr
    }

    /// True if the expression imposes no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// An edit applied to a phoneme's feature set.
///
/// Removal happens before addition, so a feature named in both lists ends
/// up present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct FeatureReplacement {
    /// Features to add.
    pub set_features: Vec<String>,
    /// Features to remove.
    pub remove_features: Vec<String>,
}

impl FeatureModel {
    /// The feature-to-phonemes inverted index, built on first use.
    ///
    /// Safe to call repeatedly and from concurrent threads; the build runs
    /// at most once per model.
    pub fn index(&self) -> &FeatureIndex {
        self.index.get_or_init(|| FeatureIndex::build(self))
    }

    /// Whether a phoneme satisfies a feature expression.
    ///
    /// Unknown phonemes never match, regardless of the expression.
    pub fn matches_expression(&self, phoneme: &str, expr: &FeatureExpression) -> bool {
        let Some(features) = self.features_of(phoneme) else {
            return false;
        };
        expr.positive
            .iter()
            .all(|p| features.contains(&p.as_str()))
            && !expr
                .negative
                .iter()
                .any(|n| features.contains(&n.as_str()))
    }

    /// All phonemes satisfying a feature expression, in model enumeration
    /// order.
    ///
    /// Positive features intersect their index postings; a positive tag
    /// the model never uses short-circuits to an empty result. An empty
    /// positive list starts from the full phoneme universe. Negative
    /// features then subtract every phoneme carrying them.
    pub fn matching_phonemes(&self, expr: &FeatureExpression) -> Vec<&'static str> {
        let index = self.index();

        let mut candidates: Option<FxHashSet<usize>> = None;
        for feature in &expr.positive {
            let Some(posting) = index.phonemes_with(feature) else {
                return Vec::new();
            };
            match &mut candidates {
                None => candidates = Some(posting.iter().copied().collect()),
                Some(set) => {
                    let posting: FxHashSet<usize> = posting.iter().copied().collect();
                    set.retain(|id| posting.contains(id));
                }
            }
        }

        let mut candidates =
            candidates.unwrap_or_else(|| (0..self.entries().len()).collect());

        for feature in &expr.negative {
            if let Some(posting) = index.phonemes_with(feature) {
                for id in posting {
                    candidates.remove(id);
                }
            }
        }

        let mut ids: Vec<usize> = candidates.into_iter().collect();
        ids.sort_unstable();
        ids.into_iter().map(|id| self.entries()[id].0).collect()
    }

    /// The known phoneme whose feature set is closest to `target`.
    ///
    /// Scans every model entry computing Jaccard similarity
    /// (`|intersection| / |union|`) between `target` and the entry's
    /// features; the highest score wins and exact ties keep the first
    /// entry seen in enumeration order. Returns `None` only for an empty
    /// model.
    ///
    /// This is a deliberate linear scan, O(model size) per call; the model
    /// is small and static, and no shortcut preserves the tie-breaking
    /// contract.
    pub fn resolve_by_features(&self, target: &FxHashSet<&str>) -> Option<&'static str> {
        let mut best: Option<&'static str> = None;
        let mut best_score = -1.0f64;

        for &(symbol, features) in self.entries() {
            let intersection = features.iter().filter(|f| target.contains(*f)).count();
            let union =
                target.len() + features.iter().filter(|f| !target.contains(*f)).count();
            let score = if union > 0 {
                intersection as f64 / union as f64
            } else {
                0.0
            };
            if score > best_score {
                best_score = score;
                best = Some(symbol);
            }
        }

        best
    }

    /// Rewrite a phoneme by editing its feature set.
    ///
    /// Computes (features − remove + set) and resolves the edited set back
    /// to the closest known phoneme. A phoneme absent from the model, or a
    /// model with no candidates, leaves the input unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use soundlaw::features::{FeatureModel, FeatureReplacement};
    ///
    /// let model = FeatureModel::global();
    /// let voice = FeatureReplacement {
    ///     set_features: vec!["voiced".to_string()],
    ///     remove_features: vec!["voiceless".to_string()],
    /// };
    /// assert_eq!(model.apply_feature_replacement("p", &voice), "b");
    /// ```
    pub fn apply_feature_replacement<'a>(
        &self,
        phoneme: &'a str,
        repl: &FeatureReplacement,
    ) -> &'a str {
        let Some(features) = self.features_of(phoneme) else {
            return phoneme;
        };
        let mut target: FxHashSet<&str> = features.iter().copied().collect();
        for feature in &repl.remove_features {
            target.remove(feature.as_str());
        }
        for feature in &repl.set_features {
            target.insert(feature.as_str());
        }
        self.resolve_by_features(&target).unwrap_or(phoneme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bracketed_expression() {
        let expr = FeatureExpression::parse("[+voiced, -stop]");
        assert_eq!(expr.positive, vec!["voiced"]);
        assert_eq!(expr.negative, vec!["stop"]);
    }

    #[test]
    fn test_parse_bare_terms_default_to_positive() {
        let expr = FeatureExpression::parse("nasal, -velar");
        assert_eq!(expr.positive, vec!["nasal"]);
        assert_eq!(expr.negative, vec!["velar"]);
    }

    #[test]
    fn test_parse_empty_expression() {
        assert!(FeatureExpression::parse("").is_empty());
        assert!(FeatureExpression::parse("[]").is_empty());
    }

    #[test]
    fn test_matches_expression() {
        let model = FeatureModel::builtin();
        let voiceless_stop = FeatureExpression {
            positive: vec!["stop".to_string(), "voiceless".to_string()],
            negative: vec![],
        };
        assert!(model.matches_expression("p", &voiceless_stop));
        assert!(!model.matches_expression("b", &voiceless_stop));
        assert!(!model.matches_expression("zzz", &voiceless_stop));
    }

    #[test]
    fn test_matching_phonemes_intersects_positive() {
        let model = FeatureModel::builtin();
        let expr = FeatureExpression {
            positive: vec!["stop".to_string(), "bilabial".to_string()],
            negative: vec![],
        };
        assert_eq!(model.matching_phonemes(&expr), vec!["p", "b"]);
    }

    #[test]
    fn test_matching_phonemes_unknown_positive_is_empty() {
        let model = FeatureModel::builtin();
        let expr = FeatureExpression {
            positive: vec!["clicks".to_string()],
            negative: vec![],
        };
        assert!(model.matching_phonemes(&expr).is_empty());
    }

    #[test]
    fn test_matching_phonemes_negative_subtracts() {
        let model = FeatureModel::builtin();
        let expr = FeatureExpression {
            positive: vec!["nasal".to_string()],
            negative: vec!["velar".to_string(), "uvular".to_string()],
        };
        let matches = model.matching_phonemes(&expr);
        assert!(matches.contains(&"m"));
        assert!(matches.contains(&"n"));
        assert!(!matches.contains(&"ŋ"));
        assert!(!matches.contains(&"ɴ"));
    }

    #[test]
    fn test_matching_phonemes_empty_expression_is_universe() {
        let model = FeatureModel::builtin();
        let all = model.matching_phonemes(&FeatureExpression::default());
        assert_eq!(all.len(), model.len());
        assert_eq!(all.first().copied(), Some("p"));
    }

    #[test]
    fn test_resolve_by_features_exact_entry() {
        let model = FeatureModel::builtin();
        let target: FxHashSet<&str> = ["consonant", "stop", "bilabial", "voiced"]
            .into_iter()
            .collect();
        assert_eq!(model.resolve_by_features(&target), Some("b"));
    }

    #[test]
    fn test_resolve_by_features_first_seen_wins_ties() {
        // ɡ and g share identical feature sets; the earlier entry wins.
        let model = FeatureModel::builtin();
        let target: FxHashSet<&str> = ["consonant", "stop", "velar", "voiced"]
            .into_iter()
            .collect();
        assert_eq!(model.resolve_by_features(&target), Some("ɡ"));
    }

    #[test]
    fn test_resolve_by_features_empty_model() {
        let model = FeatureModel::from_entries(&[]);
        let target: FxHashSet<&str> = ["consonant"].into_iter().collect();
        assert_eq!(model.resolve_by_features(&target), None);
    }

    #[test]
    fn test_apply_feature_replacement_voices_stop() {
        let model = FeatureModel::builtin();
        let repl = FeatureReplacement {
            set_features: vec!["voiced".to_string()],
            remove_features: vec!["voiceless".to_string()],
        };
        assert_eq!(model.apply_feature_replacement("p", &repl), "b");
        assert_eq!(model.apply_feature_replacement("t", &repl), "d");
        assert_eq!(model.apply_feature_replacement("s", &repl), "z");
    }

    #[test]
    fn test_apply_feature_replacement_unknown_unchanged() {
        let model = FeatureModel::builtin();
        let repl = FeatureReplacement {
            set_features: vec!["voiced".to_string()],
            remove_features: vec![],
        };
        assert_eq!(model.apply_feature_replacement("%", &repl), "%");
    }

    #[test]
    fn test_index_build_is_idempotent() {
        let model = FeatureModel::builtin();
        let first = model.index() as *const _;
        let second = model.index() as *const _;
        assert_eq!(first, second);
    }
}
