//! Wire model for selectable master-data options.
//!
//! Every master-data endpoint transmits options as
//! `{ id, code, name, status? }`. Several endpoints omit `status`
//! entirely; a missing status is treated as Active. Fields use
//! `#[serde(default)]` for resilience against schema drift in the live
//! backend — `serde(deny_unknown_fields)` is intentionally NOT used.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a master-data option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OptionStatus {
    /// Offered for selection.
    #[default]
    Active,
    /// Retired; never offered for selection.
    Inactive,
    /// Forward-compatible catch-all for statuses the backend introduces
    /// after this client version is deployed. Treated as not selectable.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One selectable item within a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Opaque backend identifier.
    pub id: String,
    /// Short display token (e.g. `"Z-N"`).
    #[serde(default)]
    pub code: String,
    /// Human-readable label.
    #[serde(default)]
    pub name: String,
    /// Lifecycle status; absent on the wire means Active.
    #[serde(default)]
    pub status: OptionStatus,
}

impl OptionItem {
    /// Whether this option may be offered for selection.
    pub fn is_selectable(&self) -> bool {
        self.status == OptionStatus::Active
    }
}
