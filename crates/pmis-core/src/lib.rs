//! # pmis-core — Foundational Types for the Master-Data Selection Stack
//!
//! This crate is the bedrock of the PMIS selection stack. It defines the
//! domain primitives shared by every other crate in the workspace and
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated hierarchy schemas.** A [`HierarchySchema`] is an ordered,
//!    non-empty list of [`LevelDef`]s checked at construction: unique keys,
//!    no parent filter on the root level, a parent filter on every deeper
//!    level. Malformed hierarchies cannot be represented.
//!
//! 2. **One wire model for options.** [`OptionItem`] is the single decoded
//!    shape for every master-data endpoint. A missing `status` field on the
//!    wire means Active — the backend omits it on several endpoints.
//!
//! 3. **Selection is a value, never mutated in place.** Every change to a
//!    [`Selection`] produces a new object through [`Selection::with_choice`]
//!    or [`Selection::cleared_from`], both of which preserve the
//!    descendant-clearing invariant by construction: an unselected level
//!    has no selected descendants.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pmis-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod hierarchy;
pub mod option_item;
pub mod selection;

// Re-export primary types for ergonomic imports.
pub use hierarchy::{HierarchySchema, LevelDef, SchemaError};
pub use option_item::{OptionItem, OptionStatus};
pub use selection::{LevelChoice, Selection, SelectionError};
