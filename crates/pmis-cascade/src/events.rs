//! # Cascade Event Stream
//!
//! Every observable action the controller takes — emitting a new
//! Selection, issuing a fetch, committing or discarding its result — is
//! published as a timestamped [`CascadeEvent`] to an [`EventSink`].
//!
//! The event stream is the single place where operationally interesting
//! distinctions live that the stores deliberately flatten: a level that
//! failed to load and a level with zero children look identical in the
//! store, but emit `FetchFailed` vs `FetchCommitted { count: 0 }` here.
//! Audit logging is a sink subscribed to this stream, never a parallel
//! ad-hoc call path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeEventKind {
    /// A new Selection was emitted to the owner.
    SelectionChanged {
        /// Key of the level the user changed.
        level: String,
        /// The id chosen at that level; empty when cleared.
        id: String,
    },
    /// A fetch for a level's options was issued.
    FetchIssued {
        /// Key of the level being fetched.
        level: String,
        /// Parent id the fetch is scoped to; `None` for root levels.
        parent_id: Option<String>,
        /// The fetch's logical-clock tag.
        seq: u64,
    },
    /// A fetch resolved and its options were committed to the store.
    FetchCommitted {
        level: String,
        seq: u64,
        /// Number of selectable options committed.
        count: usize,
    },
    /// A fetch resolved after its level had moved on; the result was
    /// discarded by the stale-response guard.
    FetchDiscarded {
        level: String,
        /// The stale fetch's tag.
        seq: u64,
        /// The tag of the fetch that superseded it.
        current_seq: u64,
    },
    /// A fetch failed; the level was left empty and idle.
    FetchFailed {
        level: String,
        seq: u64,
        reason: String,
    },
}

/// A timestamped cascade action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeEvent {
    /// When the action happened.
    pub at: DateTime<Utc>,
    /// What happened.
    pub kind: CascadeEventKind,
}

impl CascadeEvent {
    pub(crate) fn now(kind: CascadeEventKind) -> Self {
        Self {
            at: Utc::now(),
            kind,
        }
    }
}

/// Observer of the cascade action stream.
///
/// Sinks must be `Send + Sync`; the controller publishes from whatever
/// task is driving it. Publishing must not block.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &CascadeEvent);
}

/// Default sink: forwards events to `tracing` at operator-appropriate
/// levels (failures and stale discards at `warn`, the rest at `debug`).
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &CascadeEvent) {
        match &event.kind {
            CascadeEventKind::SelectionChanged { level, id } => {
                tracing::debug!(level, id, "selection changed");
            }
            CascadeEventKind::FetchIssued { level, parent_id, seq } => {
                tracing::debug!(level, ?parent_id, seq, "fetch issued");
            }
            CascadeEventKind::FetchCommitted { level, seq, count } => {
                tracing::debug!(level, seq, count, "fetch committed");
            }
            CascadeEventKind::FetchDiscarded { level, seq, current_seq } => {
                tracing::warn!(level, seq, current_seq, "stale fetch result discarded");
            }
            CascadeEventKind::FetchFailed { level, seq, reason } => {
                tracing::warn!(level, seq, "fetch failed, level left empty: {reason}");
            }
        }
    }
}

/// Test sink that records every published event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: parking_lot::Mutex<Vec<CascadeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events published so far.
    pub fn events(&self) -> Vec<CascadeEvent> {
        self.events.lock().clone()
    }

    /// The kinds published so far, for order assertions.
    pub fn kinds(&self) -> Vec<CascadeEventKind> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &CascadeEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_captures_in_order() {
        let sink = RecordingSink::new();
        sink.publish(&CascadeEvent::now(CascadeEventKind::SelectionChanged {
            level: "zone".into(),
            id: "Z1".into(),
        }));
        sink.publish(&CascadeEvent::now(CascadeEventKind::FetchIssued {
            level: "circle".into(),
            parent_id: Some("Z1".into()),
            seq: 1,
        }));

        let kinds = sink.kinds();
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], CascadeEventKind::SelectionChanged { .. }));
        assert!(matches!(kinds[1], CascadeEventKind::FetchIssued { seq: 1, .. }));
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = CascadeEvent::now(CascadeEventKind::FetchFailed {
            level: "circle".into(),
            seq: 3,
            reason: "backend down".into(),
        });
        let json = serde_json::to_string(&event).expect("serialize");
        let back: CascadeEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.kind, event.kind);
    }
}
