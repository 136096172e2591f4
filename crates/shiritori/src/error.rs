//! Error types for the judge.

use shiritori_core::ConfigError;
use shiritori_store::StoreError;
use thiserror::Error;

/// Errors that can occur while building or running the judge.
///
/// Negative verdicts are not errors; see [`Verdict`](crate::Verdict).
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Storage fault: the slot could not be locked, read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Dictionary or table load failure.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

/// Result type for judge operations.
pub type Result<T> = std::result::Result<T, JudgeError>;
