//! Raw text to effective reading: normalization followed by extraction.

use std::sync::Arc;

use crate::dictionary::{ReadingDictionary, ReplaceDictionary};
use crate::normalize::TextNormalizer;
use crate::reading::ReadingExtractor;
use crate::tokenize::{ScriptTokenizer, Tokenizer};
use crate::types::{EffectiveReading, ReadingResponse};

/// The read-only half of the judge. Pure and shareable across tasks.
#[derive(Debug)]
pub struct ReadingPipeline {
    normalizer: TextNormalizer,
    extractor: ReadingExtractor,
}

impl ReadingPipeline {
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        readings: ReadingDictionary,
        replacements: ReplaceDictionary,
    ) -> Self {
        Self {
            normalizer: TextNormalizer::new(replacements),
            extractor: ReadingExtractor::new(tokenizer, Arc::new(readings)),
        }
    }

    pub fn from_parts(normalizer: TextNormalizer, extractor: ReadingExtractor) -> Self {
        Self {
            normalizer,
            extractor,
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    /// Effective head and last kana of `raw`, or `None` if unreadable.
    pub fn effective_reading(&self, raw: &str) -> Option<EffectiveReading> {
        let normalized = self.normalizer.normalize(raw);
        self.extractor.effective_head_and_last(&normalized)
    }

    /// Wire response for the read-only query interface.
    pub fn query(&self, raw: &str) -> ReadingResponse {
        ReadingResponse::from(self.effective_reading(raw))
    }
}

impl Default for ReadingPipeline {
    /// Script tokenizer, empty dictionaries.
    fn default() -> Self {
        Self::new(
            Arc::new(ScriptTokenizer),
            ReadingDictionary::new(),
            ReplaceDictionary::new(),
        )
    }
}
