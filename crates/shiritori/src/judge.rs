//! The Judge: decides whether a post continues the word chain.
//!
//! The Judge brings together the reading pipeline and the chain store.
//! Readings are derived without any lock; only the read-check-write of the
//! chain slot runs under the store's lock.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use shiritori_core::{
    is_connected, ChainState, EffectiveReading, EventId, Kana, ReadingPipeline, ReadingResponse,
};
use shiritori_store::{ChainSlot, ChainStore, ChainStoreExt};

use crate::config::JudgeConfig;
use crate::error::Result;

/// Outcome of judging one post.
///
/// Every variant is a normal result; storage faults are reported as
/// [`JudgeError::Storage`](crate::JudgeError::Storage) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The post continues the chain and is now its tail.
    Accepted { head: Kana, last: Kana },
    /// The post's head does not follow the stored last kana.
    RejectedNotConnected { prev_last: Kana, head: Kana },
    /// This event already advanced the chain.
    RejectedDuplicate,
    /// No kana could be resolved from the post.
    Unreadable,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// The main Judge struct.
///
/// Clones share the pipeline and store; `judge` may be called concurrently.
pub struct Judge<S: ChainStore> {
    /// Normalization and reading extraction.
    pipeline: Arc<ReadingPipeline>,
    /// The chain slot.
    store: Arc<S>,
    /// Configuration.
    config: JudgeConfig,
}

impl<S: ChainStore> Clone for Judge<S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: ChainStore> Judge<S> {
    /// Create a new judge.
    pub fn new(pipeline: ReadingPipeline, store: S, config: JudgeConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store: Arc::new(store),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pipeline(&self) -> &ReadingPipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read-only Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Effective head and last kana of `text`. Never touches chain state.
    pub fn get_effective_reading(&self, text: &str) -> Option<EffectiveReading> {
        self.pipeline.effective_reading(text)
    }

    /// Wire response for the read-only query interface.
    pub fn query(&self, text: &str) -> ReadingResponse {
        self.pipeline.query(text)
    }

    /// The stored chain state, `None` before the first acceptance.
    pub async fn chain_state(&self) -> Result<Option<ChainState>> {
        Ok(self.store.current_state(self.config.lock_timeout).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Judgement
    // ─────────────────────────────────────────────────────────────────────────

    /// Judge a post and, if it continues the chain, make it the new tail.
    pub async fn judge(&self, text: &str, event_id: impl Into<EventId>) -> Result<Verdict> {
        let event_id = event_id.into();

        let Some(reading) = self.pipeline.effective_reading(text) else {
            info!(event_id = %event_id, "post unreadable");
            return Ok(Verdict::Unreadable);
        };
        debug!(
            event_id = %event_id,
            head = %reading.head,
            last = %reading.last,
            "effective reading resolved"
        );

        let candidate = event_id.clone();
        let verdict = self
            .store
            .with_lock(self.config.lock_timeout, move |slot| {
                decide(slot, reading, candidate)
            })
            .await?;

        match &verdict {
            Verdict::Accepted { head, last } => {
                info!(event_id = %event_id, %head, %last, "post accepted")
            }
            Verdict::RejectedNotConnected { prev_last, head } => {
                info!(event_id = %event_id, %prev_last, %head, "post rejected: not connected")
            }
            Verdict::RejectedDuplicate => {
                info!(event_id = %event_id, "post rejected: duplicate event")
            }
            Verdict::Unreadable => {}
        }
        Ok(verdict)
    }
}

/// The locked read-check-write step.
fn decide(
    slot: &mut dyn ChainSlot,
    reading: EffectiveReading,
    event_id: EventId,
) -> shiritori_store::Result<Verdict> {
    if let Some(state) = slot.read()? {
        if state.last_event_id == event_id {
            return Ok(Verdict::RejectedDuplicate);
        }
        if !is_connected(state.last_kana, reading.head) {
            return Ok(Verdict::RejectedNotConnected {
                prev_last: state.last_kana,
                head: reading.head,
            });
        }
    }

    slot.write(&ChainState::new(reading.last, event_id))?;
    Ok(Verdict::Accepted {
        head: reading.head,
        last: reading.last,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiritori_store::{MemoryChainStore, StoreError};
    use std::time::Duration;

    fn k(c: char) -> Kana {
        Kana::new(c).unwrap()
    }

    fn judge_with(store: MemoryChainStore) -> Judge<MemoryChainStore> {
        Judge::new(ReadingPipeline::default(), store, JudgeConfig::default())
    }

    #[tokio::test]
    async fn test_first_post_is_accepted() {
        let judge = judge_with(MemoryChainStore::new());
        let v = judge.judge("ンジャメナ", "ev1").await.unwrap();
        assert_eq!(v, Verdict::Accepted { head: k('ン'), last: k('ナ') });
        let state = judge.chain_state().await.unwrap().unwrap();
        assert_eq!(state.last_kana, k('ナ'));
        assert_eq!(state.last_event_id.as_str(), "ev1");
    }

    #[tokio::test]
    async fn test_unreadable_leaves_state() {
        let judge = judge_with(MemoryChainStore::new());
        assert_eq!(judge.judge("！？", "ev1").await.unwrap(), Verdict::Unreadable);
        assert_eq!(judge.chain_state().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_voiced_last_accepts_unvoiced_head() {
        let store =
            MemoryChainStore::with_state(ChainState::new(k('ガ'), EventId::new("ev0")));
        let judge = judge_with(store);
        assert!(judge.judge("かめ", "ev1").await.unwrap().is_accepted());
    }

    #[tokio::test]
    async fn test_not_connected_reports_both_kana() {
        let store =
            MemoryChainStore::with_state(ChainState::new(k('カ'), EventId::new("ev0")));
        let judge = judge_with(store);
        let v = judge.judge("がっこう", "ev1").await.unwrap();
        assert_eq!(
            v,
            Verdict::RejectedNotConnected { prev_last: k('カ'), head: k('ガ') }
        );
    }

    #[tokio::test]
    async fn test_duplicate_checked_before_connection() {
        let store =
            MemoryChainStore::with_state(ChainState::new(k('ク'), EventId::new("ev2")));
        let judge = judge_with(store);
        // would connect, but the event already advanced the chain
        assert_eq!(
            judge.judge("くるま", "ev2").await.unwrap(),
            Verdict::RejectedDuplicate
        );
    }

    #[tokio::test]
    async fn test_query_never_touches_state() {
        let judge = judge_with(MemoryChainStore::new());
        let resp = judge.query("あいうえお");
        assert!(resp.readable);
        assert_eq!(resp.head, Some(k('ア')));
        assert_eq!(judge.chain_state().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lock_timeout_is_storage_error() {
        let store = Arc::new(MemoryChainStore::new());
        let judge = Judge {
            pipeline: Arc::new(ReadingPipeline::default()),
            store: store.clone(),
            config: JudgeConfig::default().with_lock_timeout(Duration::from_millis(20)),
        };

        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let holder = tokio::spawn(async move {
            store
                .with_lock(None, move |_| {
                    locked_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
                .await
        });

        tokio::task::spawn_blocking(move || locked_rx.recv().unwrap())
            .await
            .unwrap();
        let err = judge.judge("あいうえお", "ev1").await.unwrap_err();
        assert!(matches!(
            err,
            crate::JudgeError::Storage(StoreError::LockTimeout(_))
        ));

        release_tx.send(()).unwrap();
        holder.await.unwrap().unwrap();
    }

    #[test]
    fn test_verdict_serializes_with_tag() {
        let v = Verdict::Accepted { head: k('ア'), last: k('オ') };
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"verdict":"accepted","head":"ア","last":"オ"}"#
        );
        assert_eq!(
            serde_json::to_string(&Verdict::Unreadable).unwrap(),
            r#"{"verdict":"unreadable"}"#
        );
    }
}
