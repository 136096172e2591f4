//! # Shiritori Store
//!
//! Durable chain slot for the shiritori judge. Provides a trait-based
//! interface for locked read-check-write access with file, SQLite and
//! in-memory implementations.
//!
//! ## Overview
//!
//! The judge never reads or writes chain state directly. It passes a closure
//! to [`ChainStore::with_lock`], which acquires the chain lock, exposes the
//! [`ChainSlot`] read/write interface, and releases on every exit path.
//!
//! ## Key Types
//!
//! - [`ChainStore`] - The async trait for scoped, exclusive slot access
//! - [`ChainSlot`] - Read-current / write-new interface available under the lock
//! - [`FileChainStore`] - Slot file guarded by an in-process mutex and `flock`
//! - [`SqliteChainStore`] - Single-row SQLite table guarded by `BEGIN IMMEDIATE`
//! - [`MemoryChainStore`] - In-memory slot for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shiritori_store::{ChainStoreExt, FileChainStore};
//!
//! async fn example() {
//!     let store = FileChainStore::open("/var/lib/shiritori/chain").unwrap();
//!     let state = store.current_state(None).await.unwrap();
//!     println!("{:?}", state);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Single slot**: the store holds only the latest state, never a log
//! - **Bounded acquisition**: callers pass the lock timeout; stores never invent one
//! - **No retries**: a storage fault is returned once

pub mod error;
#[cfg(unix)]
pub mod file;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
#[cfg(unix)]
pub use file::FileChainStore;
pub use memory::MemoryChainStore;
pub use sqlite::SqliteChainStore;
pub use traits::{ChainSlot, ChainStore, ChainStoreExt};
