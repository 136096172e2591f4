//! # Shiritori
//!
//! The shiritori judge: decides whether a post continues a word chain where
//! each entry's first sound must match the previous entry's last sound.
//!
//! ## Overview
//!
//! A post is judged in two phases:
//!
//! - **Reading**: the text is normalized (emoji, URLs, identifiers removed,
//!   numerals read aloud) and tokenized, and its effective head and last
//!   kana are resolved. Pure; no lock is taken.
//! - **Chaining**: under the chain lock, the stored last kana is read, the
//!   head is checked against it, and on success the post's last kana becomes
//!   the new tail.
//!
//! ## Key Concepts
//!
//! - **Canonical kana**: all comparisons use full-width katakana.
//! - **Connection**: a head follows a last kana if they are equal or the head
//!   is an allowed successor (ガ accepts カ, ャ accepts ヤ, ...).
//! - **Duplicate**: an event that already advanced the chain cannot advance it
//!   again.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use shiritori::{Judge, JudgeConfig, ReaderConfig, Verdict};
//! use shiritori::core::ScriptTokenizer;
//! use shiritori::store::FileChainStore;
//!
//! async fn example() {
//!     let pipeline = ReaderConfig::default()
//!         .build_pipeline(Arc::new(ScriptTokenizer))
//!         .unwrap();
//!     let store = FileChainStore::open("/var/lib/shiritori/chain").unwrap();
//!     let judge = Judge::new(pipeline, store, JudgeConfig::default());
//!
//!     match judge.judge("しりとり", "event-id").await.unwrap() {
//!         Verdict::Accepted { head, last } => println!("{head} .. {last}"),
//!         other => println!("{other:?}"),
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `shiritori::core` - Readings, kana and connection rules
//! - `shiritori::store` - Chain slot storage

pub mod config;
pub mod error;
pub mod judge;

// Re-export component crates
pub use shiritori_core as core;
pub use shiritori_store as store;

// Re-export main types for convenience
pub use config::{JudgeConfig, ReaderConfig};
pub use error::{JudgeError, Result};
pub use judge::{Judge, Verdict};

// Re-export commonly used core types
pub use shiritori_core::{
    ChainState, EffectiveReading, EventId, Kana, ReadingPipeline, ReadingResponse, Token,
    Tokenizer,
};
