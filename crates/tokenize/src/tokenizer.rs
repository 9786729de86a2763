#![forbid(unsafe_code)]

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word-splitting policy shared by vocabulary construction and encoding.
///
/// The same tokenizer instance must be used for both, otherwise the encoded
/// indices drift away from the ones the vocabulary assigned.
pub trait Tokenizer: Send + Sync {
    /// Split `text` into words. Empty pieces are never returned.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Errors raised while assembling a tokenizer from configuration.
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    /// `pattern` tokenizer selected without a pattern
    #[error("pattern tokenizer requires a token pattern")]
    MissingPattern,
    /// The configured separator pattern does not compile
    #[error("invalid token pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Returns true for characters that belong inside a word: ASCII letters and
/// digits, underscore and the basic Cyrillic block `А..=я`.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('А'..='я').contains(&c)
}

/// Default word-boundary tokenizer.
///
/// Splits on every run of characters outside `[A-Za-zА-Яа-я0-9_]`, so
/// apostrophes, hyphens and accented letters all act as separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !is_word_char(c))
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Splits on whitespace and ASCII punctuation only; non-ASCII letters stay
/// inside words.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationTokenizer;

impl Tokenizer for PunctuationTokenizer {
    fn tokenize(&self, s: &str) -> Vec<String> {
        s.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect()
    }
}

/// Tokenizer driven by a user supplied separator regex.
#[derive(Debug, Clone)]
pub struct PatternTokenizer {
    separator: Regex,
}

impl PatternTokenizer {
    /// Compile `pattern` as the separator expression.
    pub fn new(pattern: &str) -> Result<Self, TokenizerError> {
        Ok(Self { separator: Regex::new(pattern)? })
    }
}

impl Tokenizer for PatternTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.separator
            .split(text)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Case rule applied to every token after splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Case {
    /// Keep tokens exactly as written
    #[default]
    Preserve,
    /// Lowercase every token
    Lower,
}

/// Wraps another tokenizer and applies a [`Case`] rule to its output.
pub struct CaseFold<T> {
    inner: T,
    case: Case,
}

impl<T: Tokenizer> CaseFold<T> {
    /// Wrap `inner`, folding its tokens according to `case`.
    pub fn new(inner: T, case: Case) -> Self {
        Self { inner, case }
    }
}

impl<T: Tokenizer> Tokenizer for CaseFold<T> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let tokens = self.inner.tokenize(text);
        match self.case {
            Case::Preserve => tokens,
            Case::Lower => tokens.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

/// Tokenizer selection as it appears in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizerKind {
    /// [`WordTokenizer`]
    #[default]
    Word,
    /// [`PunctuationTokenizer`]
    Punctuation,
    /// [`PatternTokenizer`], requires a pattern
    Pattern,
}

impl TokenizerKind {
    /// Build the boxed tokenizer for this kind with the given case rule.
    pub fn build(
        self,
        case: Case,
        pattern: Option<&str>,
    ) -> Result<Box<dyn Tokenizer>, TokenizerError> {
        Ok(match self {
            TokenizerKind::Word => Box::new(CaseFold::new(WordTokenizer, case)),
            TokenizerKind::Punctuation => Box::new(CaseFold::new(PunctuationTokenizer, case)),
            TokenizerKind::Pattern => {
                let pattern = pattern.ok_or(TokenizerError::MissingPattern)?;
                Box::new(CaseFold::new(PatternTokenizer::new(pattern)?, case))
            }
        })
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_tokenizer_splits_on_non_word_runs() {
        let toks = WordTokenizer.tokenize("  don't stop--now, ok?");
        assert_eq!(toks, vec!["don", "t", "stop", "now", "ok"]);
    }

    #[test]
    fn word_tokenizer_keeps_cyrillic_and_underscore() {
        let toks = WordTokenizer.tokenize("привет мир_1!");
        assert_eq!(toks, vec!["привет", "мир_1"]);
    }

    #[test]
    fn word_tokenizer_empty_input() {
        assert!(WordTokenizer.tokenize("").is_empty());
        assert!(WordTokenizer.tokenize(" ,.; ").is_empty());
    }

    #[test]
    fn punctuation_tokenizer_keeps_accented_letters() {
        let toks = PunctuationTokenizer.tokenize("café au-lait");
        assert_eq!(toks, vec!["café", "au", "lait"]);
    }

    #[test]
    fn pattern_tokenizer_uses_custom_separator() {
        let tok = PatternTokenizer::new(r"\|+").unwrap();
        assert_eq!(tok.tokenize("a||b|c d"), vec!["a", "b", "c d"]);
    }

    #[test]
    fn pattern_kind_requires_pattern() {
        let res = TokenizerKind::Pattern.build(Case::Preserve, None);
        assert!(matches!(res, Err(TokenizerError::MissingPattern)));
        let res = TokenizerKind::Pattern.build(Case::Preserve, Some("("));
        assert!(matches!(res, Err(TokenizerError::InvalidPattern(_))));
    }

    #[test]
    fn case_fold_lowercases() {
        let tok = TokenizerKind::Word.build(Case::Lower, None).unwrap();
        assert_eq!(tok.tokenize("The CAT"), vec!["the", "cat"]);
        let tok = TokenizerKind::Word.build(Case::Preserve, None).unwrap();
        assert_eq!(tok.tokenize("The CAT"), vec!["The", "CAT"]);
    }
}
