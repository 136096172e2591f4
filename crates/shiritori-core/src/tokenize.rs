//! Tokenizer capability.
//!
//! Morphological analysis is consumed through the [`Tokenizer`] trait so the
//! reading pipeline never depends on a particular backend. [`ScriptTokenizer`]
//! is a backend-free default that segments by character class.

use unicode_script::{Script, UnicodeScript};

use crate::kana::{is_halfwidth_block, is_hiragana, to_katakana};

/// One segment of tokenized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The text as it appears in the input.
    pub surface: String,
    /// Phonetic reading supplied by the tokenizer, if any.
    pub reading: Option<String>,
}

impl Token {
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: None,
        }
    }

    pub fn with_reading(surface: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: Some(reading.into()),
        }
    }
}

/// Segments text into an ordered sequence of tokens.
///
/// Implementations must be deterministic: identical input yields identical
/// tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for std::sync::Arc<T> {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        (**self).tokenize(text)
    }
}

/// Character class used by [`ScriptTokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Kana,
    Ideograph,
    Latin,
    Digit,
    Whitespace,
    Symbol,
}

/// Segments text into runs of the same character class.
///
/// Kana runs carry their katakana reading. Ideograph runs carry none, so
/// without a morphological backend kanji-only text is unreadable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTokenizer;

impl ScriptTokenizer {
    fn classify(c: char) -> CharClass {
        if is_kana_like(c) {
            CharClass::Kana
        } else if c.is_ascii_alphabetic() {
            CharClass::Latin
        } else if c.is_ascii_digit() {
            CharClass::Digit
        } else if c.is_whitespace() {
            CharClass::Whitespace
        } else if c.script() == Script::Han {
            CharClass::Ideograph
        } else {
            CharClass::Symbol
        }
    }

    fn finish(class: CharClass, surface: String, tokens: &mut Vec<Token>) {
        match class {
            CharClass::Whitespace => {}
            CharClass::Kana => {
                let reading = to_katakana(&surface);
                tokens.push(Token::with_reading(surface, reading));
            }
            _ => tokens.push(Token::new(surface)),
        }
    }
}

impl Tokenizer for ScriptTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current: Option<(CharClass, String)> = None;

        for c in text.chars() {
            let class = Self::classify(c);
            match current.as_mut() {
                Some((cur, buf)) if *cur == class => buf.push(c),
                _ => {
                    if let Some((cur, buf)) = current.take() {
                        Self::finish(cur, buf, &mut tokens);
                    }
                    current = Some((class, c.to_string()));
                }
            }
        }
        if let Some((cur, buf)) = current {
            Self::finish(cur, buf, &mut tokens);
        }
        tokens
    }
}

/// Kana letters plus the marks that only make sense inside a kana run.
fn is_kana_like(c: char) -> bool {
    is_hiragana(c)
        || ('\u{30A1}'..='\u{30FA}').contains(&c)
        || matches!(c, 'ー' | 'ヽ' | 'ヾ' | 'ゝ' | 'ゞ' | '゛' | '゜' | '\u{3099}' | '\u{309A}')
        || is_halfwidth_block(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed() {
        let tokens = ScriptTokenizer.tokenize("mix English と日本語!");
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, ["mix", "English", "と", "日本語", "!"]);
        assert_eq!(tokens[2].reading.as_deref(), Some("ト"));
        assert_eq!(tokens[3].reading, None);
    }

    #[test]
    fn test_halfwidth_run_is_one_token() {
        let tokens = ScriptTokenizer.tokenize("ｳﾞｧｯ");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].reading.as_deref(), Some("ヴァッ"));
    }

    #[test]
    fn test_prolonged_mark_stays_in_run() {
        let tokens = ScriptTokenizer.tokenize("あーー！？");
        assert_eq!(tokens[0].surface, "あーー");
        assert_eq!(tokens[0].reading.as_deref(), Some("アーー"));
        assert_eq!(tokens[1].surface, "！？");
    }

    #[test]
    fn test_supplementary_ideographs_join_run() {
        // CJK Extension G and the compatibility supplement
        let tokens = ScriptTokenizer.tokenize("漢\u{30000}\u{2F800}字々");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].surface, "漢\u{30000}\u{2F800}字々");
        assert_eq!(tokens[0].reading, None);
    }

    #[test]
    fn test_deterministic() {
        let text = "カナと漢字が混ざった文";
        assert_eq!(ScriptTokenizer.tokenize(text), ScriptTokenizer.tokenize(text));
    }
}
