//! Text tokenizer
//!
//! Turns a raw text cell into an ordered token sequence: stop characters
//! are deleted, the text is split on spaces and upper-cased, then optionally
//! expanded into word n-grams or character n-grams.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Stop characters used when none are configured
pub const DEFAULT_STOP_CHARACTERS: &str = ".,;:()?!*";

/// Tokenizer settings, captured by every codebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Characters deleted before splitting
    #[serde(default = "default_stop_characters")]
    pub stop_characters: String,

    /// Maximum number of successive words (1 = unigrams only)
    #[serde(default = "default_word_ngram")]
    pub word_ngram: usize,

    /// Length of character n-grams (0 = disabled)
    #[serde(default)]
    pub char_ngram: usize,
}

fn default_stop_characters() -> String {
    DEFAULT_STOP_CHARACTERS.to_string()
}

fn default_word_ngram() -> usize {
    1
}

impl TokenizerConfig {
    pub fn new<S: Into<String>>(stop_characters: S, word_ngram: usize, char_ngram: usize) -> Self {
        Self {
            stop_characters: stop_characters.into(),
            word_ngram,
            char_ngram,
        }
    }

    /// Word and character n-grams are mutually exclusive
    pub fn has_conflicting_ngrams(&self) -> bool {
        self.word_ngram > 1 && self.char_ngram > 0
    }

    #[inline]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text, &self.stop_characters, self.word_ngram, self.char_ngram)
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_CHARACTERS, 1, 0)
    }
}

/// Tokenize one text cell.
///
/// Empty tokens are removed from the final sequence only, so word n-grams
/// over text with repeated spaces keep their blank components (`"A "`).
/// Word n-grams are appended after the unigrams, by increasing length and
/// start position. Character n-grams replace the unigrams and slide over
/// their concatenation. Requesting both is reported and falls back to
/// plain unigrams.
pub fn tokenize(text: &str, stop_characters: &str, word_ngram: usize, char_ngram: usize) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| !stop_characters.contains(*c))
        .collect();

    // Empty tokens between adjacent spaces take part in the expansion;
    // trailing ones are dropped right away.
    let mut unigrams: Vec<String> = cleaned
        .split(' ')
        .map(|token| token.trim_matches(' ').to_uppercase())
        .collect();
    while unigrams.last().is_some_and(|t| t.is_empty()) {
        unigrams.pop();
    }

    let tokens = if word_ngram > 1 && char_ngram > 0 {
        warn!(
            "Only one of word n-grams ({}) and character n-grams ({}) may be used, falling back to unigrams",
            word_ngram, char_ngram
        );
        unigrams
    } else if word_ngram > 1 && unigrams.len() > 1 {
        word_ngrams(unigrams, word_ngram)
    } else if char_ngram > 0 && !unigrams.is_empty() {
        char_ngrams(&unigrams, char_ngram)
    } else {
        unigrams
    };

    tokens.into_iter().filter(|t| !t.is_empty()).collect()
}

/// Unigrams followed by every n-gram of length 2..=max_n
fn word_ngrams(unigrams: Vec<String>, max_n: usize) -> Vec<String> {
    let m = unigrams.len();
    let extra: usize = (2..=max_n.min(m)).map(|n| m - n + 1).sum();

    let mut grams = Vec::with_capacity(m + extra);
    for n in 2..=max_n.min(m) {
        for window in unigrams.windows(n) {
            grams.push(window.join(" "));
        }
    }

    let mut tokens = unigrams;
    tokens.extend(grams);
    tokens
}

/// Every window of `n` characters over the concatenated tokens
fn char_ngrams(tokens: &[String], n: usize) -> Vec<String> {
    let stream: Vec<char> = tokens.iter().flat_map(|t| t.chars()).collect();
    if stream.len() < n {
        return Vec::new();
    }
    stream
        .windows(n)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unigrams() {
        let tokens = tokenize("the quick brown fox", "", 1, 0);
        assert_eq!(tokens, vec!["THE", "QUICK", "BROWN", "FOX"]);
    }

    #[test]
    fn test_no_empty_tokens() {
        let tokens = tokenize("  a   b ", "", 1, 0);
        assert_eq!(tokens, vec!["A", "B"]);
        assert!(tokenize("", "", 1, 0).is_empty());
        assert!(tokenize("   ", "", 1, 0).is_empty());
    }

    #[test]
    fn test_stop_characters() {
        let tokens = tokenize("hello, world! (yes) ...", ".,;:()?!*", 1, 0);
        assert_eq!(tokens, vec!["HELLO", "WORLD", "YES"]);
    }

    #[test]
    fn test_stop_characters_are_a_set() {
        // "ab" deletes both characters, not the substring
        let tokens = tokenize("ba cab abc", "ab", 1, 0);
        assert_eq!(tokens, vec!["C", "C"]);
    }

    #[test]
    fn test_only_spaces_split() {
        let tokens = tokenize("tab\tseparated new\nline", "", 1, 0);
        assert_eq!(tokens, vec!["TAB\tSEPARATED", "NEW\nLINE"]);
    }

    #[test]
    fn test_word_bigrams() {
        let tokens = tokenize("a b c", "", 2, 0);
        assert_eq!(tokens, vec!["A", "B", "C", "A B", "B C"]);
    }

    #[test]
    fn test_word_trigrams() {
        let tokens = tokenize("a b c d", "", 3, 0);
        assert_eq!(
            tokens,
            vec!["A", "B", "C", "D", "A B", "B C", "C D", "A B C", "B C D"]
        );
    }

    #[test]
    fn test_word_ngram_larger_than_text() {
        let tokens = tokenize("a b", "", 4, 0);
        assert_eq!(tokens, vec!["A", "B", "A B"]);
        assert_eq!(tokenize("single", "", 3, 0), vec!["SINGLE"]);
    }

    #[test]
    fn test_word_ngrams_keep_blank_components() {
        assert_eq!(tokenize("a  b", "", 2, 0), vec!["A", "B", "A ", " B"]);
        assert_eq!(tokenize(" a", "", 2, 0), vec!["A", " A"]);
        assert_eq!(tokenize("a ! b", "!", 2, 0), vec!["A", "B", "A ", " B"]);
    }

    #[test]
    fn test_word_ngrams_ignore_trailing_spaces() {
        assert_eq!(tokenize("a b  ", "", 2, 0), vec!["A", "B", "A B"]);
        assert_eq!(tokenize("a ", "", 2, 0), vec!["A"]);
    }

    #[test]
    fn test_char_ngrams() {
        let tokens = tokenize("ab cd", "", 1, 3);
        assert_eq!(tokens, vec!["ABC", "BCD"]);
    }

    #[test]
    fn test_char_ngrams_too_short() {
        assert!(tokenize("ab", "", 1, 3).is_empty());
        assert!(tokenize("", "", 1, 2).is_empty());
    }

    #[test]
    fn test_char_ngrams_unicode() {
        let tokens = tokenize("çé ü", "", 1, 2);
        assert_eq!(tokens, vec!["ÇÉ", "ÉÜ"]);
    }

    #[test]
    fn test_conflicting_ngrams_fall_back() {
        let config = TokenizerConfig::new("", 2, 3);
        assert!(config.has_conflicting_ngrams());
        assert_eq!(config.tokenize("a b c"), vec!["A", "B", "C"]);
        assert_eq!(config.tokenize("a  b"), vec!["A", "B"]);
    }

    #[test]
    fn test_config_defaults() {
        let config: TokenizerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TokenizerConfig::default());
        assert_eq!(config.stop_characters, DEFAULT_STOP_CHARACTERS);
        assert_eq!(config.word_ngram, 1);
        assert_eq!(config.char_ngram, 0);
    }
}
