//! Phoneme tokenization.
//!
//! Splits a raw string into phoneme tokens against a caller-supplied
//! inventory, using greedy longest-match so multi-character symbols such
//! as `tʃ` or `dz` are consumed as single tokens. Characters that match
//! no inventory entry fall back to single-character tokens, which makes
//! the segmentation total: concatenating the tokens always reconstructs
//! the input exactly.

use smallvec::SmallVec;

/// Segment a word into phoneme tokens.
///
/// The inventory is sorted by descending length once per call (a stable
/// sort, so equal-length entries keep their given order) and tried
/// longest-first at each position. Empty inventory entries are ignored.
/// The function is deterministic and side-effect-free; it performs no
/// cross-call caching and is cheap enough to call redundantly.
///
/// # Examples
///
/// ```rust
/// use soundlaw::tokenizer::tokenize;
///
/// let tokens = tokenize("atʃa", &["a", "t", "tʃ"]);
/// assert_eq!(tokens, vec!["a", "tʃ", "a"]);
/// ```
pub fn tokenize<'a, S: AsRef<str>>(word: &'a str, inventory: &[S]) -> Vec<&'a str> {
    if word.is_empty() {
        return Vec::new();
    }

    let mut sorted: SmallVec<[&str; 64]> = inventory
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < word.len() {
        let rest = &word[pos..];
        if let Some(symbol) = sorted.iter().find(|symbol| rest.starts_with(**symbol)) {
            tokens.push(&word[pos..pos + symbol.len()]);
            pos += symbol.len();
        } else {
            // No inventory match; consume a single character.
            let width = rest.chars().next().map_or(1, char::len_utf8);
            tokens.push(&word[pos..pos + width]);
            pos += width;
        }
    }

    tokens
}

/// Concatenate phoneme tokens back into a string.
pub fn join_phonemes(tokens: &[&str]) -> String {
    tokens.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_wins() {
        let tokens = tokenize("atʃa", &["a", "t", "ʃ", "tʃ"]);
        assert_eq!(tokens, vec!["a", "tʃ", "a"]);
    }

    #[test]
    fn test_single_char_fallback_for_unknown_symbols() {
        let tokens = tokenize("pax", &["p", "a"]);
        assert_eq!(tokens, vec!["p", "a", "x"]);
    }

    #[test]
    fn test_empty_word() {
        assert!(tokenize("", &["a", "b"]).is_empty());
    }

    #[test]
    fn test_empty_inventory_falls_back_per_character() {
        let tokens = tokenize("kata", &[] as &[&str]);
        assert_eq!(tokens, vec!["k", "a", "t", "a"]);
    }

    #[test]
    fn test_empty_inventory_entries_ignored() {
        let tokens = tokenize("ab", &["", "ab"]);
        assert_eq!(tokens, vec!["ab"]);
    }

    #[test]
    fn test_round_trip_reconstructs_input() {
        let word = "tʃadzitɕa";
        let tokens = tokenize(word, &["tʃ", "dz", "tɕ", "a", "i"]);
        assert_eq!(join_phonemes(&tokens), word);
    }

    #[test]
    fn test_round_trip_with_combining_marks() {
        // Unknown combining diacritics still reconstruct exactly.
        let word = "ãtʃo̤";
        let tokens = tokenize(word, &["tʃ", "o", "a"]);
        assert_eq!(join_phonemes(&tokens), word);
    }
}
