//! Error types for the shiritori core.

use std::path::PathBuf;

use thiserror::Error;

/// Core errors that can occur while decoding persisted data.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed chain state: {0}")]
    MalformedState(String),
}

/// Dictionary and table loading errors.
///
/// These are fatal at startup: a judge must not serve with partially
/// loaded tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read dictionary {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid replace pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
