//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use shiritori::{Judge, JudgeConfig};
use shiritori_core::{
    ReadingDictionary, ReadingPipeline, ReplaceDictionary, ScriptTokenizer, Token, Tokenizer,
};
use shiritori_store::{FileChainStore, MemoryChainStore, SqliteChainStore};
use tempfile::TempDir;

/// A tokenizer that answers from a script.
///
/// Texts with a scripted answer get exactly those tokens; anything else is
/// segmented by [`ScriptTokenizer`]. Scripts are keyed by the normalized
/// text the extractor sees.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTokenizer {
    script: HashMap<String, Vec<Token>>,
}

impl ScriptedTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `text` with `tokens`.
    pub fn on(mut self, text: &str, tokens: Vec<Token>) -> Self {
        self.script.insert(text.to_string(), tokens);
        self
    }
}

impl Tokenizer for ScriptedTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        match self.script.get(text) {
            Some(tokens) => tokens.clone(),
            None => ScriptTokenizer.tokenize(text),
        }
    }
}

/// Pipeline with the given tokenizer and dictionary text.
pub fn pipeline_with(
    tokenizer: impl Tokenizer + 'static,
    readings: &str,
    replacements: &str,
) -> ReadingPipeline {
    let replacements =
        ReplaceDictionary::parse(replacements).expect("fixture replace dictionary is valid");
    ReadingPipeline::new(
        Arc::new(tokenizer),
        ReadingDictionary::parse(readings),
        replacements,
    )
}

/// A small English reading dictionary for tests.
pub const SAMPLE_READINGS: &str = "\
# word reading
ENGLISH イングリッシュ
JAPAN ジャパン
PUNK パンク
RUST ラスト
OKAY オーケイ
CITY シティ
";

/// A test fixture with a scratch directory for durable slots.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path of the slot file inside the fixture directory.
    pub fn slot_path(&self) -> PathBuf {
        self.dir.path().join("shiritori.chain")
    }

    /// Path of the SQLite database inside the fixture directory.
    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("shiritori.db")
    }

    /// Pipeline over the script tokenizer and [`SAMPLE_READINGS`].
    pub fn pipeline(&self) -> ReadingPipeline {
        pipeline_with(ScriptTokenizer, SAMPLE_READINGS, "")
    }

    pub fn memory_judge(&self) -> Judge<MemoryChainStore> {
        Judge::new(self.pipeline(), MemoryChainStore::new(), JudgeConfig::default())
    }

    /// A judge on the fixture's slot file. Each call opens a new handle.
    pub fn file_judge(&self) -> Judge<FileChainStore> {
        let store = FileChainStore::open(self.slot_path()).expect("open slot file");
        Judge::new(self.pipeline(), store, JudgeConfig::default())
    }

    /// A judge on the fixture's database. Each call opens a new connection.
    pub fn sqlite_judge(&self) -> Judge<SqliteChainStore> {
        let store = SqliteChainStore::open(self.db_path()).expect("open chain database");
        Judge::new(self.pipeline(), store, JudgeConfig::default())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiritori::Verdict;
    use shiritori_core::Kana;

    #[test]
    fn test_scripted_tokenizer_falls_back() {
        let t = ScriptedTokenizer::new().on("猫", vec![Token::with_reading("猫", "ネコ")]);
        assert_eq!(t.tokenize("猫"), vec![Token::with_reading("猫", "ネコ")]);
        assert_eq!(t.tokenize("ねこ"), ScriptTokenizer.tokenize("ねこ"));
    }

    #[test]
    fn test_scripted_reading_reaches_pipeline() {
        let t = ScriptedTokenizer::new().on(
            "東京タワー",
            vec![Token::with_reading("東京", "トウキョウ"), Token::new("タワー")],
        );
        let pipeline = pipeline_with(t, "", "");
        let r = pipeline.effective_reading("東京タワー").unwrap();
        assert_eq!(r.head, Kana::new('ト').unwrap());
        assert_eq!(r.last, Kana::new('ワ').unwrap());
    }

    #[tokio::test]
    async fn test_fixture_file_judges_share_slot() {
        let fixture = TestFixture::new();
        let a = fixture.file_judge();
        let b = fixture.file_judge();
        assert!(a.judge("rust", "ev1").await.unwrap().is_accepted());
        assert!(matches!(
            b.judge("rust", "ev1").await.unwrap(),
            Verdict::RejectedDuplicate
        ));
    }
}
