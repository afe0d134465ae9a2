//! Rule, rule-set, and changelog types for sound-change application.

use std::collections::BTreeMap;

use crate::features::{FeatureExpression, FeatureReplacement};

/// Named alternation groups used inside literal context patterns.
///
/// Conventionally `V` maps to the vowels and `C` to the consonants of an
/// inventory, but any name works. A `BTreeMap` keeps expansion order
/// deterministic.
pub type MacroTable = BTreeMap<String, Vec<String>>;

/// A single sound-change rule.
///
/// The matching behavior lives entirely in [`RuleKind`]; a rule is either
/// literal or featural, never both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SoundChangeRule {
    /// Stable identifier, echoed into changelog entries.
    pub rule_id: String,
    /// Optional human description; when empty, a default is derived from
    /// the rule body.
    pub description: String,
    /// Literal substrings that suppress the rule when present in the word
    /// being transformed.
    pub exceptions: Vec<String>,
    /// The matching mode and its fields.
    pub kind: RuleKind,
}

/// The two matching modes a rule can use.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum RuleKind {
    /// Literal string targets with regex-built context patterns.
    Literal(LiteralRule),
    /// Feature-expression targets over tokenized phonemes.
    Featural(FeatureRule),
}

/// Literal-mode rule fields.
///
/// `target` and `replacement` are whitespace-separated lists of
/// alternatives, aligned pairwise; a shorter replacement list is padded by
/// repeating its last element (or the empty string when the list is
/// empty, which deletes). Context patterns may contain macro names and
/// raw regex syntax; `#` alone denotes a word boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LiteralRule {
    /// Target alternatives, e.g. `"p t k"`.
    pub target: String,
    /// Replacement alternatives, e.g. `"b d ɡ"`.
    pub replacement: String,
    /// Pattern that must match immediately before the target.
    pub context_before: String,
    /// Pattern that must match immediately after the target.
    pub context_after: String,
}

/// Feature-mode rule fields.
///
/// The target expression selects tokens; the adjacent-token context
/// expressions apply only when present and non-empty. A context
/// requirement that falls outside the word (before the first token or
/// after the last) makes the rule skip that position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct FeatureRule {
    /// Expression a token must satisfy to be rewritten.
    pub target: FeatureExpression,
    /// Feature edit applied to matching tokens.
    pub replacement: FeatureReplacement,
    /// Expression the preceding token must satisfy, if any.
    pub context_before: Option<FeatureExpression>,
    /// Expression the following token must satisfy, if any.
    pub context_after: Option<FeatureExpression>,
}

/// An ordered collection of rules applied as a unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RuleSet {
    /// Stable identifier.
    pub ruleset_id: String,
    /// Display name.
    pub name: String,
    /// Application order; rule sets run in ascending `order`, and rules
    /// within a set run in list order.
    pub order: i32,
    /// The rules, in application order.
    pub rules: Vec<SoundChangeRule>,
}

/// One changelog entry: a rule that actually changed the word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct StepLog {
    /// Identifier of the rule that fired.
    pub rule_id: String,
    /// The rule's description, or a derived default.
    pub description: String,
    /// Word state before this rule.
    pub before: String,
    /// Word state after this rule.
    pub after: String,
    /// Feature-mode per-token details, e.g. `"p→b [+voiced, -voiceless]"`,
    /// joined with `"; "` when several tokens changed.
    pub feature_detail: Option<String>,
}

impl SoundChangeRule {
    /// The description used in changelog entries when none was authored.
    pub fn default_description(&self) -> String {
        match &self.kind {
            RuleKind::Literal(lit) => format!("{} → {}", lit.target, lit.replacement),
            RuleKind::Featural(_) => "[feature] → [feature]".to_string(),
        }
    }
}

/// Build a macro table from a phoneme inventory.
///
/// Seeds `V` with the vowels and `C` with the consonants, then merges
/// `extra` on top (user macros override the defaults on name collision).
pub fn macros_from_inventory<S: AsRef<str>>(
    consonants: &[S],
    vowels: &[S],
    extra: MacroTable,
) -> MacroTable {
    let mut macros = MacroTable::new();
    macros.insert(
        "V".to_string(),
        vowels.iter().map(|s| s.as_ref().to_string()).collect(),
    );
    macros.insert(
        "C".to_string(),
        consonants.iter().map(|s| s.as_ref().to_string()).collect(),
    );
    macros.extend(extra);
    macros
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_description_literal() {
        let rule = SoundChangeRule {
            rule_id: "r1".to_string(),
            description: String::new(),
            exceptions: vec![],
            kind: RuleKind::Literal(LiteralRule {
                target: "p t".to_string(),
                replacement: "b d".to_string(),
                ..LiteralRule::default()
            }),
        };
        assert_eq!(rule.default_description(), "p t → b d");
    }

    #[test]
    fn test_default_description_featural() {
        let rule = SoundChangeRule {
            rule_id: "r2".to_string(),
            description: String::new(),
            exceptions: vec![],
            kind: RuleKind::Featural(FeatureRule::default()),
        };
        assert_eq!(rule.default_description(), "[feature] → [feature]");
    }

    #[test]
    fn test_macros_from_inventory_seeds_v_and_c() {
        let macros = macros_from_inventory(&["p", "t"], &["a", "i"], MacroTable::new());
        assert_eq!(macros["V"], vec!["a", "i"]);
        assert_eq!(macros["C"], vec!["p", "t"]);
    }

    #[test]
    fn test_macros_from_inventory_extra_overrides() {
        let mut extra = MacroTable::new();
        extra.insert("V".to_string(), vec!["e".to_string()]);
        extra.insert("N".to_string(), vec!["n".to_string(), "m".to_string()]);
        let macros = macros_from_inventory(&["p"], &["a"], extra);
        assert_eq!(macros["V"], vec!["e"]);
        assert_eq!(macros["N"], vec!["n", "m"]);
    }
}
