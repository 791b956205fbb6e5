//! # Remote Option Source — the Collaborator Contract
//!
//! [`OptionSource`] is the seam between the cascade controller and
//! whatever supplies level options: the live HTTP backend
//! ([`crate::MasterDataClient`]) in production, a programmable mock
//! ([`crate::MockOptionSource`]) in tests.
//!
//! ## Contract
//!
//! - Returned lists are order-irrelevant and contain only selectable
//!   (Active) options.
//! - An empty list is a valid, non-error response — the parent
//!   legitimately has no children. Failures are `Err`, never an empty
//!   `Ok`; the controller relies on that distinction for its fallback and
//!   degradation behavior.
//!
//! Implementations must be `Send + Sync` so they can be shared across
//! async tasks behind an `Arc`. The trait is object-safe to support
//! runtime source selection (mock vs. live).

use async_trait::async_trait;
use pmis_core::{LevelDef, OptionItem};

use crate::error::MasterDataError;

/// Supplier of level options for a cascade.
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Fetch the options of a root level (no parent dependency).
    async fn root_options(&self, level: &LevelDef) -> Result<Vec<OptionItem>, MasterDataError>;

    /// Fetch the options of `child` scoped to `parent_id` at `parent`.
    async fn child_options(
        &self,
        parent: &LevelDef,
        parent_id: &str,
        child: &LevelDef,
    ) -> Result<Vec<OptionItem>, MasterDataError>;

    /// Human-readable name of this source implementation.
    fn source_name(&self) -> &str;
}
