//! Strong type definitions for the shiritori judge.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::kana::Kana;

/// Head and last kana of a post's effective reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectiveReading {
    pub head: Kana,
    pub last: Kana,
}

/// Identifier of the source event a post arrived in.
///
/// Opaque to the judge; only compared for equality.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The single durable chain record: the last accepted kana and the event
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainState {
    pub last_kana: Kana,
    pub last_event_id: EventId,
}

impl ChainState {
    pub fn new(last_kana: Kana, last_event_id: EventId) -> Self {
        Self {
            last_kana,
            last_event_id,
        }
    }

    /// Slot encoding: `"{last_kana}\n{last_event_id}"`.
    pub fn to_slot_bytes(&self) -> Vec<u8> {
        format!("{}\n{}", self.last_kana, self.last_event_id).into_bytes()
    }

    /// Decode a slot. An empty slot holds no state yet.
    pub fn from_slot_bytes(bytes: &[u8]) -> Result<Option<Self>, CoreError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| CoreError::MalformedState(format!("not UTF-8: {e}")))?;
        let (kana_line, event_id) = text.split_once('\n').unwrap_or((text, ""));

        let mut chars = kana_line.chars();
        let kana = match (chars.next(), chars.next()) {
            (Some(c), None) => Kana::new(c),
            _ => None,
        }
        .ok_or_else(|| {
            CoreError::MalformedState(format!("expected one katakana, got {kana_line:?}"))
        })?;

        Ok(Some(Self::new(kana, EventId::new(event_id))))
    }
}

/// Response body of the read-only reading query.
///
/// `head` and `last` are present only when `readable` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub readable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Kana>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<Kana>,
}

impl From<Option<EffectiveReading>> for ReadingResponse {
    fn from(reading: Option<EffectiveReading>) -> Self {
        match reading {
            Some(r) => Self {
                readable: true,
                head: Some(r.head),
                last: Some(r.last),
            },
            None => Self {
                readable: false,
                head: None,
                last: None,
            },
        }
    }
}
