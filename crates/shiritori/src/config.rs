//! Judge and reader configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use shiritori_core::{ReadingDictionary, ReadingPipeline, ReplaceDictionary, Tokenizer};

use crate::error::Result;

/// Where the reading tables come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Reading dictionary files, loaded in order. Later files override
    /// earlier entries for the same word.
    pub reading_dictionaries: Vec<PathBuf>,
    /// Replace dictionary file, if any.
    pub replace_dictionary: Option<PathBuf>,
}

impl ReaderConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load every table and build the reading pipeline.
    ///
    /// Fails on the first unreadable file or invalid pattern; nothing is
    /// served from partially loaded tables.
    pub fn build_pipeline(&self, tokenizer: Arc<dyn Tokenizer>) -> Result<ReadingPipeline> {
        let mut readings = ReadingDictionary::new();
        for path in &self.reading_dictionaries {
            readings.extend_from_file(path)?;
        }
        let replacements = match &self.replace_dictionary {
            Some(path) => ReplaceDictionary::load(path)?,
            None => ReplaceDictionary::new(),
        };
        Ok(ReadingPipeline::new(tokenizer, readings, replacements))
    }
}

/// Configuration for the Judge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Upper bound on chain lock acquisition. `None` waits without bound.
    #[serde(rename = "lock_timeout_ms", default, with = "millis")]
    pub lock_timeout: Option<Duration>,
}

impl JudgeConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }
}

/// `Option<Duration>` as optional whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
