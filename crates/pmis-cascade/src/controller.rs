//! # Cascade Controller — Async Driver
//!
//! [`CascadeController`] wires the pure [`CascadeState`] to an
//! [`OptionSource`] and an owner callback. It is the component boundary
//! from the owner's point of view: the owner holds the Selection, the
//! controller proposes new values through `on_change` and keeps the
//! per-level option stores current.
//!
//! ## Ordering
//!
//! The synchronous phase of [`CascadeController::select`] — Selection
//! reconstruction, `on_change`, descendant store reset — completes before
//! the first await point. The fetch that follows resolves against the
//! stale-response guard in [`CascadeState`], so overlapping selections
//! settle to the latest one no matter the arrival order of their
//! responses.
//!
//! ## Failure Policy
//!
//! Fetch errors never reach the owner. A failed fetch (after the HTTP
//! client's own fallback path) leaves its level empty and idle, publishes
//! `FetchFailed` for operators, and the workflow continues. Only caller
//! bugs — unknown level keys, selecting under an unselected ancestor —
//! surface as [`CascadeError`].

use std::sync::Arc;

use parking_lot::Mutex;
use pmis_core::{HierarchySchema, LevelDef, OptionItem, Selection, SelectionError};
use pmis_master_client::OptionSource;

use crate::events::{CascadeEvent, CascadeEventKind, EventSink, TracingSink};
use crate::state::{CascadeOptions, CascadeState, FetchResolution, FetchTicket};

/// Callback through which the controller proposes new Selections.
pub type ChangeListener = Box<dyn Fn(&Selection) + Send + Sync>;

/// Errors surfaced to callers of the controller.
///
/// Fetch failures are deliberately absent — they degrade the option
/// stores, they do not fail the call.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    /// The level key is not part of this cascade's schema.
    #[error("unknown level key: {key}")]
    UnknownLevel {
        /// The key that was passed.
        key: String,
    },
    /// The selection reduction was rejected.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Async driver for one cascade instance.
///
/// Methods take `&self`; the pure state sits behind a mutex that is held
/// only across synchronous reductions, never across an await. Overlapping
/// `select` calls are therefore possible and resolved by the guard.
pub struct CascadeController {
    state: Mutex<CascadeState>,
    source: Arc<dyn OptionSource>,
    on_change: ChangeListener,
    sink: Arc<dyn EventSink>,
}

impl CascadeController {
    /// Controller with the default tracing event sink.
    pub fn new(
        schema: HierarchySchema,
        options: CascadeOptions,
        source: Arc<dyn OptionSource>,
        on_change: ChangeListener,
    ) -> Self {
        Self::with_sink(schema, options, source, on_change, Arc::new(TracingSink))
    }

    /// Controller publishing its action stream to `sink`.
    pub fn with_sink(
        schema: HierarchySchema,
        options: CascadeOptions,
        source: Arc<dyn OptionSource>,
        on_change: ChangeListener,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            state: Mutex::new(CascadeState::new(schema, options)),
            source,
            on_change,
            sink,
        }
    }

    /// Fetch the root level's options eagerly.
    pub async fn mount(&self) {
        let (ticket, root) = {
            let mut state = self.state.lock();
            let ticket = state.mount();
            let root = state
                .schema()
                .level(0)
                .expect("schema depth is validated non-zero")
                .clone();
            (ticket, root)
        };
        self.publish(CascadeEventKind::FetchIssued {
            level: root.key.clone(),
            parent_id: None,
            seq: ticket.seq,
        });

        let result = self.source.root_options(&root).await;
        self.settle(&root, &ticket, result.map_err(|e| e.to_string()));
    }

    /// Apply a user choice of `id` (empty to clear) at the level `key`.
    ///
    /// Returns the Selection that was emitted to the owner. The `on_change`
    /// callback fires exactly once, synchronously, before any fetch is
    /// awaited.
    pub async fn select(&self, key: &str, id: &str) -> Result<Selection, CascadeError> {
        let (selection, fetch) = {
            let mut state = self.state.lock();
            let rank = state
                .schema()
                .rank_of(key)
                .ok_or_else(|| CascadeError::UnknownLevel {
                    key: key.to_string(),
                })?;
            let outcome = state.select_at(rank, id)?;
            let fetch = outcome.ticket.map(|ticket| {
                let parent = state
                    .schema()
                    .level(rank)
                    .expect("rank resolved from schema")
                    .clone();
                let child = state
                    .schema()
                    .level(ticket.level)
                    .expect("ticket level exists")
                    .clone();
                (ticket, parent, child)
            });
            (outcome.selection, fetch)
        };

        (self.on_change)(&selection);
        self.publish(CascadeEventKind::SelectionChanged {
            level: key.to_string(),
            id: id.to_string(),
        });

        if let Some((ticket, parent, child)) = fetch {
            self.publish(CascadeEventKind::FetchIssued {
                level: child.key.clone(),
                parent_id: ticket.parent_id.clone(),
                seq: ticket.seq,
            });
            let result = self.source.child_options(&parent, id, &child).await;
            self.settle(&child, &ticket, result.map_err(|e| e.to_string()));
        }

        Ok(selection)
    }

    /// The last emitted Selection.
    pub fn selection(&self) -> Selection {
        self.state.lock().selection().clone()
    }

    /// The options currently offered for the level `key`.
    pub fn options_at(&self, key: &str) -> Vec<OptionItem> {
        let state = self.state.lock();
        state
            .schema()
            .rank_of(key)
            .and_then(|rank| state.store(rank))
            .map(|store| store.options().to_vec())
            .unwrap_or_default()
    }

    /// Whether a fetch for the level `key` is in flight.
    pub fn is_loading(&self, key: &str) -> bool {
        let state = self.state.lock();
        state
            .schema()
            .rank_of(key)
            .and_then(|rank| state.store(rank))
            .is_some_and(|store| store.is_loading())
    }

    fn settle(&self, level: &LevelDef, ticket: &FetchTicket, result: Result<Vec<OptionItem>, String>) {
        let failure = result.as_ref().err().cloned();
        let resolution = self.state.lock().complete_fetch(ticket, result);
        match resolution {
            FetchResolution::Committed { count } => self.publish(CascadeEventKind::FetchCommitted {
                level: level.key.clone(),
                seq: ticket.seq,
                count,
            }),
            FetchResolution::DiscardedStale { current_seq } => {
                self.publish(CascadeEventKind::FetchDiscarded {
                    level: level.key.clone(),
                    seq: ticket.seq,
                    current_seq,
                })
            }
            FetchResolution::Failed => self.publish(CascadeEventKind::FetchFailed {
                level: level.key.clone(),
                seq: ticket.seq,
                reason: failure.unwrap_or_else(|| "fetch failed".to_string()),
            }),
        }
    }

    fn publish(&self, kind: CascadeEventKind) {
        self.sink.publish(&CascadeEvent::now(kind));
    }
}
