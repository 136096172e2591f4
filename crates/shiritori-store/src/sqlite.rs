//! SQLite implementation of the ChainStore trait.
//!
//! The chain slot is the single row of `chain_state`. Cross-process
//! exclusion comes from SQLite itself: every critical section runs in a
//! `BEGIN IMMEDIATE` transaction, which takes the database write lock up
//! front, and `busy_timeout` bounds how long to wait for it. The async
//! mutex around the connection orders callers in this process; a caller's
//! timeout covers both waits together.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use tokio::sync::Mutex;
use tracing::debug;

use shiritori_core::{ChainState, EventId, Kana};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{ChainSlot, ChainStore};

/// SQLite-based chain store.
///
/// Thread-safe via an internal async Mutex. All operations use
/// spawn_blocking to avoid blocking the async runtime.
pub struct SqliteChainStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteChainStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl std::fmt::Debug for SqliteChainStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteChainStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChainStore for SqliteChainStore {
    async fn with_lock<R, F>(&self, timeout: Option<Duration>, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut dyn ChainSlot) -> Result<R> + Send + 'static,
    {
        let started = Instant::now();
        let conn = self.conn.clone();
        let mut conn = match timeout {
            Some(limit) => tokio::time::timeout(limit, conn.lock_owned())
                .await
                .map_err(|_| StoreError::LockTimeout(limit))?,
            None => conn.lock_owned().await,
        };
        let busy = match timeout {
            Some(limit) => limit.saturating_sub(started.elapsed()),
            None => Duration::from_millis(i32::MAX as u64),
        };

        tokio::task::spawn_blocking(move || {
            conn.busy_timeout(busy)?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| busy_to_timeout(e, timeout))?;
            debug!("chain lock acquired");

            let result = f(&mut SqliteSlot { conn: &tx });
            match result {
                Ok(value) => {
                    tx.commit()?;
                    debug!("chain lock released");
                    Ok(value)
                }
                // dropping the transaction rolls back
                Err(e) => {
                    drop(tx);
                    debug!("chain lock released after error");
                    Err(e)
                }
            }
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn busy_to_timeout(err: rusqlite::Error, timeout: Option<Duration>) -> StoreError {
    match (err.sqlite_error_code(), timeout) {
        (Some(ErrorCode::DatabaseBusy), Some(limit)) => StoreError::LockTimeout(limit),
        _ => StoreError::Database(err),
    }
}

/// The `chain_state` row, seen through the [`ChainSlot`] interface.
struct SqliteSlot<'a> {
    conn: &'a Connection,
}

impl ChainSlot for SqliteSlot<'_> {
    fn read(&mut self) -> Result<Option<ChainState>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT last_kana, last_event_id FROM chain_state WHERE slot = 0",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((kana, event_id)) = row else {
            return Ok(None);
        };
        let mut chars = kana.chars();
        let kana = match (chars.next(), chars.next()) {
            (Some(c), None) => Kana::new(c),
            _ => None,
        }
        .ok_or_else(|| StoreError::InvalidData(format!("last_kana is not one katakana: {kana:?}")))?;

        Ok(Some(ChainState::new(kana, EventId::new(event_id))))
    }

    fn write(&mut self, state: &ChainState) -> Result<()> {
        self.conn.execute(
            "INSERT INTO chain_state (slot, last_kana, last_event_id, updated_at)
             VALUES (0, ?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET
                last_kana = excluded.last_kana,
                last_event_id = excluded.last_event_id,
                updated_at = excluded.updated_at",
            params![
                state.last_kana.to_string(),
                state.last_event_id.as_str(),
                now_millis(),
            ],
        )?;
        Ok(())
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
