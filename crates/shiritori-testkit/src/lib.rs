//! # Shiritori Testkit
//!
//! Testing utilities for the shiritori judge.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known texts with expected head/last kana
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A scripted fake tokenizer and ready-made judges
//!
//! ## Golden Vectors
//!
//! ```rust
//! use shiritori_testkit::fixtures::TestFixture;
//! use shiritori_testkit::vectors::verify_all_vectors;
//!
//! let pipeline = TestFixture::new().pipeline();
//! assert!(verify_all_vectors(&pipeline).is_empty());
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use shiritori_core::is_connected;
//! use shiritori_testkit::generators::kana;
//!
//! proptest! {
//!     #[test]
//!     fn every_kana_connects_to_itself(k in kana()) {
//!         prop_assert!(is_connected(k, k));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! A scripted tokenizer stands in for a morphological backend:
//!
//! ```rust
//! use shiritori_core::{Token, Tokenizer};
//! use shiritori_testkit::fixtures::ScriptedTokenizer;
//!
//! let tokenizer = ScriptedTokenizer::new()
//!     .on("猫", vec![Token::with_reading("猫", "ネコ")]);
//! assert_eq!(tokenizer.tokenize("猫")[0].reading.as_deref(), Some("ネコ"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{pipeline_with, ScriptedTokenizer, TestFixture, SAMPLE_READINGS};
pub use vectors::{all_vectors, numeral_vectors, verify_all_vectors, GoldenVector};
