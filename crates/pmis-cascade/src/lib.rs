//! # PMIS Cascade — Hierarchical Selector Orchestration
//!
//! The level controller behind cascading master-data selectors: a chain
//! of levels (zone, circle, division, sub-division and the other preset
//! hierarchies in `pmis-core`) where choosing a value at one level loads
//! the options for the next and clears everything below.
//!
//! ## Architecture
//!
//! The crate splits along the sync/async seam:
//!
//! - [`CascadeState`] is the pure core — schema, per-level
//!   [`LevelStore`]s, a mirror of the last emitted Selection, and the
//!   per-level fetch sequences that implement the stale-response guard.
//!   Every transition is a synchronous reduction, directly testable
//!   without a runtime.
//! - [`CascadeController`] drives the state against an
//!   [`OptionSource`](pmis_master_client::OptionSource), emits Selections
//!   to the owner through its change listener, and publishes a
//!   [`CascadeEvent`] stream to an [`EventSink`].
//!
//! The Selection itself is owned by the caller. The controller never
//! mutates it in place; it proposes replacements through `on_change` and
//! keeps an internal mirror only to resolve names and detect
//! reselection.

pub mod controller;
pub mod events;
pub mod state;
pub mod store;

pub use controller::{CascadeController, CascadeError, ChangeListener};
pub use events::{CascadeEvent, CascadeEventKind, EventSink, RecordingSink, TracingSink};
pub use state::{CascadeOptions, CascadeState, FetchResolution, FetchTicket, SelectOutcome};
pub use store::LevelStore;
