//! Store traits: the abstract interface to the durable chain slot.
//!
//! The judge never touches a slot directly. It hands a closure to
//! [`ChainStore::with_lock`], which acquires exclusive access to the chain,
//! exposes the narrow [`ChainSlot`] interface for the duration of the
//! closure, and releases on every exit path.

use std::time::Duration;

use async_trait::async_trait;
use shiritori_core::ChainState;

use crate::error::Result;

/// Read-current / write-new access to the single chain record.
///
/// Only reachable while the chain lock is held.
pub trait ChainSlot {
    /// The stored state, or `None` if nothing was ever accepted.
    fn read(&mut self) -> Result<Option<ChainState>>;

    /// Overwrite the stored state.
    fn write(&mut self, state: &ChainState) -> Result<()>;
}

/// The ChainStore trait: scoped exclusive access to the chain slot.
///
/// # Design Notes
///
/// - **Two-layer exclusion**: implementations order same-process callers
///   with an in-process mutex and other processes with a lock on the
///   durable resource itself.
/// - **Bounded waits**: `timeout` bounds the whole acquisition. `None` waits
///   without bound. An expired bound is [`StoreError::LockTimeout`] and the
///   closure never runs.
/// - **Blocking closure**: `f` runs on a blocking thread with the lock held.
///   It must not do anything but slot I/O and pure checks.
///
/// [`StoreError::LockTimeout`]: crate::StoreError::LockTimeout
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Run `f` against the slot with the chain lock held.
    async fn with_lock<R, F>(&self, timeout: Option<Duration>, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut dyn ChainSlot) -> Result<R> + Send + 'static;
}

/// Extension trait for one-shot slot access.
pub trait ChainStoreExt: ChainStore {
    /// Read the current state under the lock.
    fn current_state(
        &self,
        timeout: Option<Duration>,
    ) -> impl std::future::Future<Output = Result<Option<ChainState>>> + Send;

    /// Overwrite the state under the lock, returning what it replaced.
    fn replace_state(
        &self,
        state: ChainState,
        timeout: Option<Duration>,
    ) -> impl std::future::Future<Output = Result<Option<ChainState>>> + Send;
}

impl<S: ChainStore> ChainStoreExt for S {
    async fn current_state(&self, timeout: Option<Duration>) -> Result<Option<ChainState>> {
        self.with_lock(timeout, |slot| slot.read()).await
    }

    async fn replace_state(
        &self,
        state: ChainState,
        timeout: Option<Duration>,
    ) -> Result<Option<ChainState>> {
        self.with_lock(timeout, move |slot| {
            let previous = slot.read()?;
            slot.write(&state)?;
            Ok(previous)
        })
        .await
    }
}
