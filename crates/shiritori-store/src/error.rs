//! Error types for the store module.

use std::time::Duration;

use shiritori_core::CoreError;
use thiserror::Error;

/// Errors that can occur while locking, reading or writing the chain slot.
///
/// Every variant is a storage fault: the request is aborted and no verdict
/// is produced.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error on the slot file or its lock.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot holds something that is not a chain state.
    #[error("corrupt chain slot: {0}")]
    Corrupt(#[from] CoreError),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The chain lock was not acquired within the caller's bound.
    #[error("chain lock not acquired within {0:?}")]
    LockTimeout(Duration),

    /// The blocking task running the critical section failed to join.
    #[error("blocking task failed: {0}")]
    Task(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
