//! In-memory implementation of the ChainStore trait.
//!
//! This is primarily for testing. It has the same locking semantics as the
//! durable stores within one process but keeps the slot in memory with no
//! persistence.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use shiritori_core::ChainState;

use crate::error::{Result, StoreError};
use crate::traits::{ChainSlot, ChainStore};

/// In-memory chain store.
///
/// All data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryChainStore {
    slot: Arc<Mutex<Option<ChainState>>>,
}

impl MemoryChainStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `state`.
    pub fn with_state(state: ChainState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
        }
    }
}

#[async_trait]
impl ChainStore for MemoryChainStore {
    async fn with_lock<R, F>(&self, timeout: Option<Duration>, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut dyn ChainSlot) -> Result<R> + Send + 'static,
    {
        let slot = self.slot.clone();
        let mut guard = match timeout {
            Some(limit) => tokio::time::timeout(limit, slot.lock_owned())
                .await
                .map_err(|_| StoreError::LockTimeout(limit))?,
            None => slot.lock_owned().await,
        };

        tokio::task::spawn_blocking(move || {
            // Stage writes so a failed closure leaves the slot untouched.
            let mut staged = MemorySlot {
                current: (*guard).clone(),
            };
            let value = f(&mut staged)?;
            *guard = staged.current;
            Ok(value)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

struct MemorySlot {
    current: Option<ChainState>,
}

impl ChainSlot for MemorySlot {
    fn read(&mut self) -> Result<Option<ChainState>> {
        Ok(self.current.clone())
    }

    fn write(&mut self, state: &ChainState) -> Result<()> {
        self.current = Some(state.clone());
        Ok(())
    }
}
