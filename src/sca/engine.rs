//! Ordered application of sound-change rule sets.
//!
//! A single linear pass: rule sets in ascending `order`, rules within a
//! set in list order, the current word threaded through the whole pass.
//! Each rule either leaves the word unchanged or transforms it atomically
//! before the next rule runs; a rule's own output is never re-scanned by
//! that rule. Rules that change the word append one [`StepLog`] entry;
//! rules that match nothing stay silent.
//!
//! Failure semantics: a context pattern the regex engine rejects skips
//! only the offending target/replacement pair, with a warning through
//! `tracing`; feature targets that resolve to no known phoneme leave the
//! token unchanged. Nothing in here returns an error to the caller.

use tracing::warn;

use super::context::ContextualReplacer;
use super::types::{FeatureRule, LiteralRule, MacroTable, RuleKind, RuleSet, SoundChangeRule, StepLog};
use crate::features::FeatureModel;
use crate::tokenizer::tokenize;

/// Result of applying every rule set to one word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SoundChangeOutcome {
    /// The fully transformed word.
    pub result: String,
    /// Every rule application that changed the word, in firing order.
    pub changelog: Vec<StepLog>,
}

/// Result of a batch application, one entry per input word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BatchOutcome {
    /// The input word.
    pub word: String,
    /// The fully transformed word.
    pub result: String,
    /// Changelog for this word.
    pub changelog: Vec<StepLog>,
}

struct RuleOutcome {
    result: String,
    changed: bool,
    feature_details: Vec<String>,
}

impl RuleOutcome {
    fn unchanged(word: &str) -> Self {
        Self {
            result: word.to_string(),
            changed: false,
            feature_details: Vec::new(),
        }
    }
}

/// Apply ordered sound-change rule sets to a word.
///
/// Rule sets run strictly in ascending `order` (a stable sort, so sets
/// sharing an `order` keep their given sequence); later sets observe the
/// output of earlier ones. `macros` feeds literal-mode context expansion.
/// `inventory` drives feature-mode tokenization; when empty, the model's
/// full vocabulary is used instead. Pass `&[] as &[&str]` when no
/// inventory applies.
///
/// # Examples
///
/// ```rust
/// use soundlaw::prelude::*;
///
/// let rule_sets = vec![RuleSet {
///     ruleset_id: "rs1".to_string(),
///     name: "Final devoicing".to_string(),
///     order: 0,
///     rules: vec![SoundChangeRule {
///         rule_id: "r1".to_string(),
///         description: String::new(),
///         exceptions: vec![],
///         kind: RuleKind::Literal(LiteralRule {
///             target: "d".to_string(),
///             replacement: "t".to_string(),
///             context_before: String::new(),
///             context_after: "#".to_string(),
///         }),
///     }],
/// }];
///
/// let outcome = apply_sound_changes(
///     FeatureModel::global(),
///     "pad",
///     &rule_sets,
///     &MacroTable::new(),
///     &[] as &[&str],
/// );
/// assert_eq!(outcome.result, "pat");
/// ```
pub fn apply_sound_changes<S: AsRef<str>>(
    model: &FeatureModel,
    word: &str,
    rule_sets: &[RuleSet],
    macros: &MacroTable,
    inventory: &[S],
) -> SoundChangeOutcome {
    let inventory: Vec<&str> = inventory.iter().map(|s| s.as_ref()).collect();

    let mut ordered: Vec<&RuleSet> = rule_sets.iter().collect();
    ordered.sort_by_key(|rs| rs.order);

    let mut current = word.to_string();
    let mut changelog = Vec::new();

    for rule_set in ordered {
        for rule in &rule_set.rules {
            let outcome = match &rule.kind {
                RuleKind::Literal(lit) => apply_literal_rule(rule, lit, &current, macros),
                RuleKind::Featural(feat) => {
                    apply_feature_rule(model, rule, feat, &current, &inventory)
                }
            };
            if outcome.changed {
                changelog.push(StepLog {
                    rule_id: rule.rule_id.clone(),
                    description: if rule.description.is_empty() {
                        rule.default_description()
                    } else {
                        rule.description.clone()
                    },
                    before: current.clone(),
                    after: outcome.result.clone(),
                    feature_detail: if outcome.feature_details.is_empty() {
                        None
                    } else {
                        Some(outcome.feature_details.join("; "))
                    },
                });
                current = outcome.result;
            }
        }
    }

    SoundChangeOutcome {
        result: current,
        changelog,
    }
}

/// Apply sound changes to a batch of words.
pub fn apply_sound_changes_batch<S: AsRef<str>, W: AsRef<str>>(
    model: &FeatureModel,
    words: &[W],
    rule_sets: &[RuleSet],
    macros: &MacroTable,
    inventory: &[S],
) -> Vec<BatchOutcome> {
    words
        .iter()
        .map(|word| {
            let word = word.as_ref();
            let outcome = apply_sound_changes(model, word, rule_sets, macros, inventory);
            BatchOutcome {
                word: word.to_string(),
                result: outcome.result,
                changelog: outcome.changelog,
            }
        })
        .collect()
}

/// Literal mode: align target/replacement alternatives pairwise and apply
/// each pair as a context-gated global replacement.
fn apply_literal_rule(
    rule: &SoundChangeRule,
    lit: &LiteralRule,
    word: &str,
    macros: &MacroTable,
) -> RuleOutcome {
    let targets: Vec<&str> = lit.target.split_whitespace().collect();
    if targets.is_empty() {
        return RuleOutcome::unchanged(word);
    }
    let replacements: Vec<&str> = lit.replacement.split_whitespace().collect();
    let padding = replacements.last().copied().unwrap_or("");

    let mut result = word.to_string();
    let mut changed = false;

    for (i, target) in targets.iter().enumerate() {
        let replacement = replacements.get(i).copied().unwrap_or(padding);

        // Exceptions are re-checked against the evolving word: an earlier
        // pair may have introduced or removed a suppressing substring.
        if rule.exceptions.iter().any(|ex| result.contains(ex.as_str())) {
            continue;
        }

        let replacer =
            match ContextualReplacer::compile(&lit.context_before, &lit.context_after, macros) {
                Ok(replacer) => replacer,
                Err(error) => {
                    warn!(
                        rule_id = %rule.rule_id,
                        pair = %format!("{} → {}", target, replacement),
                        %error,
                        "skipping target/replacement pair with invalid context pattern"
                    );
                    continue;
                }
            };

        let next = replacer.replace_all(&result, target, replacement);
        if next != result {
            changed = true;
            result = next;
        }
    }

    RuleOutcome {
        result,
        changed,
        feature_details: Vec::new(),
    }
}

/// Feature mode: rewrite tokens whose features match the target
/// expression, subject to adjacent-token context expressions.
fn apply_feature_rule(
    model: &FeatureModel,
    rule: &SoundChangeRule,
    feat: &FeatureRule,
    word: &str,
    inventory: &[&str],
) -> RuleOutcome {
    if rule.exceptions.iter().any(|ex| word.contains(ex.as_str())) {
        return RuleOutcome::unchanged(word);
    }

    let model_vocabulary: Vec<&str>;
    let inventory = if inventory.is_empty() {
        model_vocabulary = model.symbols().collect();
        model_vocabulary.as_slice()
    } else {
        inventory
    };

    let tokens = tokenize(word, inventory);
    let mut result_tokens = tokens.clone();
    let mut details = Vec::new();
    let mut changed = false;

    for i in 0..tokens.len() {
        if !model.matches_expression(tokens[i], &feat.target) {
            continue;
        }

        if let Some(expr) = &feat.context_before {
            if !expr.is_empty() {
                if i == 0 {
                    continue;
                }
                if !model.matches_expression(tokens[i - 1], expr) {
                    continue;
                }
            }
        }

        if let Some(expr) = &feat.context_after {
            if !expr.is_empty() {
                if i + 1 == tokens.len() {
                    continue;
                }
                if !model.matches_expression(tokens[i + 1], expr) {
                    continue;
                }
            }
        }

        let replacement = model.apply_feature_replacement(tokens[i], &feat.replacement);
        if replacement != tokens[i] {
            details.push(feature_detail(tokens[i], replacement, feat));
            result_tokens[i] = replacement;
            changed = true;
        }
    }

    RuleOutcome {
        result: result_tokens.concat(),
        changed,
        feature_details: details,
    }
}

fn feature_detail(original: &str, replacement: &str, feat: &FeatureRule) -> String {
    let set: Vec<String> = feat
        .replacement
        .set_features
        .iter()
        .map(|f| format!("+{}", f))
        .collect();
    let removed: Vec<String> = feat
        .replacement
        .remove_features
        .iter()
        .map(|f| format!("-{}", f))
        .collect();
    let applied: Vec<String> = [set.join(","), removed.join(",")]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    format!("{}→{} [{}]", original, replacement, applied.join(", "))
}
