//! # Shiritori Core
//!
//! Pure primitives for the shiritori judge: kana, readings, and connection rules.
//!
//! This crate contains no storage, no locking, no networking. Apart from
//! loading dictionary files at startup it is pure computation over text.
//!
//! ## Key Types
//!
//! - [`Kana`] - A canonical full-width katakana character
//! - [`EffectiveReading`] - Head and last kana of a post
//! - [`ChainState`] - The persisted last kana and event id
//! - [`ReadingPipeline`] - Normalization plus extraction, raw text in, reading out
//!
//! ## Pipeline
//!
//! Raw text passes through [`normalize`] and is then tokenized and resolved
//! by [`reading`]. Whether one reading may follow another is decided by
//! [`connection`].

pub mod connection;
pub mod dictionary;
pub mod error;
pub mod kana;
pub mod normalize;
pub mod numeral;
pub mod pipeline;
pub mod reading;
pub mod tokenize;
pub mod types;

pub use connection::is_connected;
pub use dictionary::{ReadingDictionary, ReplaceDictionary, Replacement};
pub use error::{ConfigError, CoreError};
pub use kana::Kana;
pub use normalize::TextNormalizer;
pub use numeral::number_reading;
pub use pipeline::ReadingPipeline;
pub use reading::{ReadingExtractor, ReadingResolver, Side};
pub use tokenize::{ScriptTokenizer, Token, Tokenizer};
pub use types::{ChainState, EffectiveReading, EventId, ReadingResponse};
