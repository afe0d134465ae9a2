//! Context pattern expansion and matching for literal-mode rules.
//!
//! Literal rules constrain where a target may be rewritten with two
//! pattern strings, one checked against the text before each occurrence
//! and one against the text after it. Both are zero-width: they gate the
//! rewrite without being consumed by it. `#` alone denotes a word
//! boundary; anything else is regex syntax in which macro names have been
//! expanded to alternations of their (escaped) members.
//!
//! The patterns compile to regexes anchored at the occurrence: the before
//! pattern as `(?:pat)$` matched against the prefix, the after pattern as
//! `^(?:pat)` matched against the suffix. Scanning advances one character
//! past a candidate whose context fails and past the whole target on
//! success, so overlapping contexts behave exactly like zero-width
//! lookaround.

use regex::Regex;
use thiserror::Error;

use super::types::MacroTable;

/// A context pattern the regex engine rejected.
///
/// Raised per target/replacement pair and recovered by skipping that
/// pair; it never aborts rule application.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The expanded context pattern failed to compile.
    #[error("invalid context pattern `{pattern}`: {source}")]
    InvalidContext {
        /// The pattern as handed to the regex engine, after macro
        /// expansion and anchoring.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// Expand macro names inside a context pattern.
///
/// Each macro name is replaced by a non-capturing alternation of its
/// members, escaped, longest member first so no member shadows a longer
/// one it prefixes. The boundary marker `#` and the empty pattern pass
/// through untouched. Macros with no members are left unexpanded.
pub(crate) fn expand_context_pattern(pattern: &str, macros: &MacroTable) -> String {
    if pattern.is_empty() || pattern == "#" {
        return pattern.to_string();
    }
    let mut result = pattern.to_string();
    for (name, members) in macros {
        if members.is_empty() {
            continue;
        }
        let mut sorted: Vec<&str> = members.iter().map(String::as_str).collect();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternation = sorted
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        result = result.replace(name.as_str(), &format!("(?:{})", alternation));
    }
    result
}

/// A compiled one-sided context constraint.
enum ContextAnchor {
    /// No constraint.
    Unconstrained,
    /// The `#` marker: the occurrence must touch the word edge.
    WordBoundary,
    /// An anchored pattern matched against the adjacent text.
    Pattern(Regex),
}

impl ContextAnchor {
    fn before(pattern: &str) -> Result<Self, PatternError> {
        match pattern {
            "" => Ok(Self::Unconstrained),
            "#" => Ok(Self::WordBoundary),
            _ => {
                let anchored = format!("(?:{})$", pattern);
                Regex::new(&anchored)
                    .map(Self::Pattern)
                    .map_err(|source| PatternError::InvalidContext {
                        pattern: anchored,
                        source,
                    })
            }
        }
    }

    fn after(pattern: &str) -> Result<Self, PatternError> {
        match pattern {
            "" => Ok(Self::Unconstrained),
            "#" => Ok(Self::WordBoundary),
            _ => {
                let anchored = format!("^(?:{})", pattern);
                Regex::new(&anchored)
                    .map(Self::Pattern)
                    .map_err(|source| PatternError::InvalidContext {
                        pattern: anchored,
                        source,
                    })
            }
        }
    }

    fn matches_prefix(&self, prefix: &str) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::WordBoundary => prefix.is_empty(),
            Self::Pattern(re) => re.is_match(prefix),
        }
    }

    fn matches_suffix(&self, suffix: &str) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::WordBoundary => suffix.is_empty(),
            Self::Pattern(re) => re.is_match(suffix),
        }
    }
}

/// A literal-target replacer gated by compiled context constraints.
pub(crate) struct ContextualReplacer {
    before: ContextAnchor,
    after: ContextAnchor,
}

impl ContextualReplacer {
    /// Expand macros in both context patterns and compile them.
    pub(crate) fn compile(
        context_before: &str,
        context_after: &str,
        macros: &MacroTable,
    ) -> Result<Self, PatternError> {
        let before = ContextAnchor::before(&expand_context_pattern(context_before, macros))?;
        let after = ContextAnchor::after(&expand_context_pattern(context_after, macros))?;
        Ok(Self { before, after })
    }

    /// Replace every occurrence of `target` whose context matches.
    ///
    /// Contexts are checked against the original word on both sides of
    /// each occurrence. When both contexts are word boundaries this
    /// degenerates to whole-word replacement.
    pub(crate) fn replace_all(&self, word: &str, target: &str, replacement: &str) -> String {
        debug_assert!(!target.is_empty());
        let mut result = String::with_capacity(word.len());
        let mut pos = 0;
        while pos < word.len() {
            let rest = &word[pos..];
            let end = pos + target.len();
            if rest.starts_with(target)
                && self.before.matches_prefix(&word[..pos])
                && self.after.matches_suffix(&word[end..])
            {
                result.push_str(replacement);
                pos = end;
            } else {
                match rest.chars().next() {
                    Some(ch) => {
                        result.push(ch);
                        pos += ch.len_utf8();
                    }
                    None => break,
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macros(entries: &[(&str, &[&str])]) -> MacroTable {
        entries
            .iter()
            .map(|(name, members)| {
                (
                    name.to_string(),
                    members.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_expand_macro_to_alternation() {
        let macros = macros(&[("V", &["a", "e", "i"])]);
        assert_eq!(expand_context_pattern("V", &macros), "(?:a|e|i)");
    }

    #[test]
    fn test_expand_sorts_members_longest_first() {
        let macros = macros(&[("C", &["t", "tʃ", "ts"])]);
        assert_eq!(expand_context_pattern("C", &macros), "(?:tʃ|ts|t)");
    }

    #[test]
    fn test_expand_escapes_members() {
        let macros = macros(&[("X", &["a.b"])]);
        assert_eq!(expand_context_pattern("X", &macros), "(?:a\\.b)");
    }

    #[test]
    fn test_boundary_and_empty_pass_through() {
        let macros = macros(&[("V", &["a"])]);
        assert_eq!(expand_context_pattern("#", &macros), "#");
        assert_eq!(expand_context_pattern("", &macros), "");
    }

    #[test]
    fn test_replace_with_before_context() {
        let r = ContextualReplacer::compile("t", "", &MacroTable::new()).unwrap();
        assert_eq!(r.replace_all("tata", "a", "o"), "toto");
    }

    #[test]
    fn test_replace_with_word_boundary_before() {
        let r = ContextualReplacer::compile("#", "", &MacroTable::new()).unwrap();
        assert_eq!(r.replace_all("pata", "p", "b"), "bata");
        assert_eq!(r.replace_all("apa", "p", "b"), "apa");
    }

    #[test]
    fn test_replace_with_word_boundary_after() {
        let r = ContextualReplacer::compile("", "#", &MacroTable::new()).unwrap();
        assert_eq!(r.replace_all("tat", "t", "d"), "tad");
    }

    #[test]
    fn test_both_boundaries_exact_match() {
        let r = ContextualReplacer::compile("#", "#", &MacroTable::new()).unwrap();
        assert_eq!(r.replace_all("pa", "pa", "ba"), "ba");
        assert_eq!(r.replace_all("papa", "pa", "ba"), "papa");
    }

    #[test]
    fn test_overlapping_contexts_are_zero_width() {
        // a_a around t: both t's in "atata" qualify because contexts are
        // not consumed.
        let r = ContextualReplacer::compile("a", "a", &MacroTable::new()).unwrap();
        assert_eq!(r.replace_all("atata", "t", "d"), "adada");
    }

    #[test]
    fn test_failed_candidate_advances_one_character() {
        // "aa" at position 0 lacks the preceding "a"; the overlapping
        // occurrence at position 1 must still be considered.
        let r = ContextualReplacer::compile("a", "", &MacroTable::new()).unwrap();
        assert_eq!(r.replace_all("aaa", "aa", "e"), "ae");
    }

    #[test]
    fn test_macro_context_end_to_end() {
        let macros = macros(&[("V", &["a", "e", "i", "o", "u"])]);
        let r = ContextualReplacer::compile("V", "V", &macros).unwrap();
        assert_eq!(r.replace_all("apati", "p", "b"), "abati");
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = ContextualReplacer::compile("(", "", &MacroTable::new());
        assert!(matches!(
            err,
            Err(PatternError::InvalidContext { .. })
        ));
    }
}
