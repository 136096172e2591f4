//! Load-once dictionaries consulted by the reading pipeline.
//!
//! Both formats are line oriented: `KEY VALUE` separated by a single space,
//! with blank lines and `#` comments ignored. Lines without a value are
//! skipped.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use crate::error::ConfigError;

fn entries(source: &str) -> impl Iterator<Item = (&str, &str)> {
    source.lines().filter_map(|line| {
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let mut fields = line.split(' ');
        let key = fields.next()?;
        let value = fields.next()?;
        (!key.is_empty()).then_some((key, value))
    })
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Uppercase Latin word -> kana reading.
#[derive(Debug, Clone, Default)]
pub struct ReadingDictionary {
    readings: HashMap<String, String>,
}

impl ReadingDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse entries from dictionary text. Later entries override earlier ones.
    pub fn parse(source: &str) -> Self {
        let mut dict = Self::new();
        dict.extend_from_str(source);
        dict
    }

    /// Load a dictionary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::parse(&read_file(path.as_ref())?))
    }

    /// Merge entries from dictionary text into this dictionary.
    pub fn extend_from_str(&mut self, source: &str) {
        for (word, reading) in entries(source) {
            self.readings.insert(word.to_ascii_uppercase(), reading.to_string());
        }
    }

    /// Merge a dictionary file into this dictionary.
    pub fn extend_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.extend_from_str(&read_file(path.as_ref())?);
        Ok(())
    }

    pub fn insert(&mut self, word: &str, reading: &str) {
        self.readings.insert(word.to_ascii_uppercase(), reading.to_string());
    }

    /// Look up an already uppercased word.
    pub fn get(&self, upper_word: &str) -> Option<&str> {
        self.readings.get(upper_word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// A compiled surface-form substitution.
#[derive(Debug, Clone)]
pub struct Replacement {
    pattern: Regex,
    replacement: String,
}

impl Replacement {
    /// Compile `pattern` as a case-insensitive, word-bounded match.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, ConfigError> {
        let compiled = Regex::new(&format!(r"\b(?i:{pattern})\b")).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

/// Ordered substitutions applied as the last normalization step.
#[derive(Debug, Clone, Default)]
pub struct ReplaceDictionary {
    rules: Vec<Replacement>,
}

impl ReplaceDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and compile substitutions; file order is application order.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let rules = entries(source)
            .map(|(pattern, replacement)| Replacement::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::parse(&read_file(path.as_ref())?)
    }

    pub fn push(&mut self, rule: Replacement) {
        self.rules.push(rule);
    }

    /// Apply every rule in order.
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reading_dictionary_parse() {
        let dict = ReadingDictionary::parse(
            "# comment\n\nostrich オストリッチ\npunk パンク\nbroken\nPunk パンクス\n",
        );
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("OSTRICH"), Some("オストリッチ"));
        // later entry wins
        assert_eq!(dict.get("PUNK"), Some("パンクス"));
        assert_eq!(dict.get("broken"), None);
    }

    #[test]
    fn test_reading_dictionary_layering() {
        let mut dict = ReadingDictionary::parse("JAPAN ジャパン\n");
        dict.extend_from_str("JAPAN ニッポン\n");
        assert_eq!(dict.get("JAPAN"), Some("ニッポン"));
    }

    #[test]
    fn test_replace_dictionary_order_and_case() {
        let dict = ReplaceDictionary::parse("let's lets\nlets レッツ\n").unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.apply("Let's go"), "レッツ go");
        // word boundary
        assert_eq!(dict.apply("outlets"), "outlets");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = ReplaceDictionary::parse("(unclosed x\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CAT キャット").unwrap();
        let dict = ReadingDictionary::load(file.path()).unwrap();
        assert_eq!(dict.get("CAT"), Some("キャット"));

        let missing = ReadingDictionary::load("/nonexistent/reading.dic");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
