//! # Cascade State — the Pure Level-Controller Core
//!
//! [`CascadeState`] holds everything a cascade instance owns: the schema,
//! one [`LevelStore`] per level, a mirror of the last emitted Selection,
//! and a per-level fetch sequence. All transitions are synchronous pure
//! reductions; network I/O lives in the async controller, which feeds
//! results back through [`CascadeState::complete_fetch`].
//!
//! ## Stale-Response Guard
//!
//! Every issued fetch is tagged with a [`FetchTicket`] carrying the
//! per-level sequence current at issue time. Any action that invalidates
//! a level's pending options — clearing it, issuing a newer fetch for
//! it — bumps that level's sequence, so a late-arriving result whose
//! ticket no longer matches is discarded on resolution. Last write wins
//! by logical clock, not by arrival order.
//!
//! ## Guarantee
//!
//! After [`CascadeState::select_at`] returns, the Selection it hands back
//! already satisfies the descendant-clearing invariant; fetches only ever
//! populate option stores, never the Selection.

use pmis_core::{HierarchySchema, OptionItem, Selection, SelectionError};

use crate::store::LevelStore;

/// Behavior toggles for a cascade instance.
#[derive(Debug, Clone)]
pub struct CascadeOptions {
    /// When false, the deepest level is never fetched and its Selection
    /// field stays perpetually empty (the selector hides that level).
    pub fetch_deepest: bool,
    /// When true, re-selecting the id a level already holds keeps the
    /// child store and skips the redundant child fetch. The emitted
    /// Selection is identical either way.
    pub skip_refetch_on_reselect: bool,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        Self {
            fetch_deepest: true,
            skip_refetch_on_reselect: false,
        }
    }
}

/// Tag for one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Rank of the level whose options are being fetched.
    pub level: usize,
    /// Parent id the fetch is scoped to; `None` for the root level.
    pub parent_id: Option<String>,
    /// The level's sequence number at issue time.
    pub seq: u64,
}

/// Result of one `select_at` reduction: the Selection to emit to the
/// owner, plus the fetch the controller must now issue, if any.
#[derive(Debug, Clone)]
pub struct SelectOutcome {
    /// The new Selection, descendant-clearing invariant already satisfied.
    pub selection: Selection,
    /// Child fetch to issue, if the chosen id warrants one.
    pub ticket: Option<FetchTicket>,
}

/// How a resolving fetch was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResolution {
    /// The result was committed to the level's store.
    Committed {
        /// Number of options committed.
        count: usize,
    },
    /// The ticket was stale; the result was discarded untouched.
    DiscardedStale {
        /// The sequence that superseded the ticket.
        current_seq: u64,
    },
    /// The fetch failed; the store was settled empty and idle.
    Failed,
}

/// Pure state of one cascade instance.
#[derive(Debug, Clone)]
pub struct CascadeState {
    schema: HierarchySchema,
    options: CascadeOptions,
    stores: Vec<LevelStore>,
    selection: Selection,
    seqs: Vec<u64>,
}

impl CascadeState {
    pub fn new(schema: HierarchySchema, options: CascadeOptions) -> Self {
        let depth = schema.depth();
        Self {
            selection: Selection::empty(depth),
            stores: vec![LevelStore::default(); depth],
            seqs: vec![0; depth],
            schema,
            options,
        }
    }

    pub fn schema(&self) -> &HierarchySchema {
        &self.schema
    }

    /// The last emitted Selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The store for `rank`, if the rank exists.
    pub fn store(&self, rank: usize) -> Option<&LevelStore> {
        self.stores.get(rank)
    }

    /// Begin the level-0 fetch. Always issues — the root level has no
    /// parent dependency.
    pub fn mount(&mut self) -> FetchTicket {
        self.issue_fetch(0, None)
    }

    /// Apply a user choice of `id` at `rank`.
    ///
    /// Resolves the display name from the level's current options (empty
    /// when absent — an expected transient state, logged at debug), builds
    /// the new Selection with descendants cleared, resets descendant
    /// stores, and decides whether a child fetch is due.
    pub fn select_at(&mut self, rank: usize, id: &str) -> Result<SelectOutcome, SelectionError> {
        let name = if id.is_empty() {
            String::new()
        } else {
            match self.stores.get(rank).and_then(|s| s.name_of(id)) {
                Some(name) => name.to_string(),
                None => {
                    tracing::debug!(rank, id, "no display name for chosen option, defaulting to empty");
                    String::new()
                }
            }
        };

        let reselected = !id.is_empty() && self.selection.id_at(rank) == id;
        let next = self.selection.with_choice(rank, id, name)?;
        self.selection = next.clone();

        let child = rank + 1;
        let keep_child_store =
            reselected && self.options.skip_refetch_on_reselect && child < self.stores.len();

        // Invalidate and clear descendant stores; a kept child store keeps
        // its sequence so any in-flight fetch for it stays committable.
        let first_cleared = if keep_child_store { child + 1 } else { child };
        for level in first_cleared..self.stores.len() {
            self.seqs[level] = self.seqs[level].wrapping_add(1);
            self.stores[level].reset();
        }

        let wants_fetch = !id.is_empty()
            && child < self.schema.depth()
            && (child != self.schema.deepest() || self.options.fetch_deepest)
            && !keep_child_store;

        let ticket = wants_fetch.then(|| self.issue_fetch(child, Some(id.to_string())));

        Ok(SelectOutcome {
            selection: next,
            ticket,
        })
    }

    /// Apply a resolved fetch, enforcing the stale-response guard.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<OptionItem>, String>,
    ) -> FetchResolution {
        let current_seq = self.seqs[ticket.level];
        if ticket.seq != current_seq {
            return FetchResolution::DiscardedStale { current_seq };
        }
        match result {
            Ok(options) => {
                let count = options.len();
                self.stores[ticket.level].commit(options);
                FetchResolution::Committed { count }
            }
            Err(_) => {
                self.stores[ticket.level].settle_empty();
                FetchResolution::Failed
            }
        }
    }

    fn issue_fetch(&mut self, rank: usize, parent_id: Option<String>) -> FetchTicket {
        self.seqs[rank] = self.seqs[rank].wrapping_add(1);
        self.stores[rank].begin_loading();
        FetchTicket {
            level: rank,
            parent_id,
            seq: self.seqs[rank],
        }
    }
}
