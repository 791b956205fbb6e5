//! # Selection — the Externally-Owned Composite Value
//!
//! A [`Selection`] records the chosen `(id, name)` pair for every level of
//! a hierarchy. It is owned by the caller of the cascade controller and is
//! never mutated in place: every change flows through [`Selection::with_choice`]
//! or [`Selection::cleared_from`], each producing a new value.
//!
//! ## Descendant-Clearing Invariant
//!
//! If a level is unselected, every deeper level is unselected. Both
//! reducers preserve the invariant by construction; `with_choice`
//! additionally refuses to select under an unselected ancestor, so an
//! invariant-satisfying `Selection` can only evolve into another
//! invariant-satisfying `Selection`.
//!
//! An empty id string means "unselected" — this mirrors the wire shape the
//! PMIS backend and its consumers exchange, where cleared dropdowns are
//! transmitted as empty strings rather than nulls.

use serde::{Deserialize, Serialize};

use crate::hierarchy::HierarchySchema;

/// Errors from selection reduction.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// The addressed level does not exist in this selection.
    #[error("level rank {rank} out of bounds for selection of depth {depth}")]
    RankOutOfBounds {
        /// The rank that was addressed.
        rank: usize,
        /// Depth of the selection.
        depth: usize,
    },

    /// A non-empty id was chosen below an unselected ancestor.
    #[error("cannot select at rank {rank}: ancestor at rank {ancestor} is unselected")]
    AncestorUnselected {
        /// The rank that was addressed.
        rank: usize,
        /// The first unselected ancestor rank.
        ancestor: usize,
    },
}

/// The chosen option at one level: opaque id plus display name.
///
/// Both fields empty means the level is unselected. A non-empty id with an
/// empty name is tolerated — display names are resolved best-effort from
/// the option list and may be transiently absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelChoice {
    /// Opaque backend id; empty when unselected.
    pub id: String,
    /// Resolved display name; empty when unselected or unresolved.
    pub name: String,
}

impl LevelChoice {
    /// Whether this level has a selection.
    pub fn is_selected(&self) -> bool {
        !self.id.is_empty()
    }
}

/// The full set of chosen ids/names across all levels of a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    choices: Vec<LevelChoice>,
}

impl Selection {
    /// A selection of the given depth with every level unselected.
    pub fn empty(depth: usize) -> Self {
        Self {
            choices: vec![LevelChoice::default(); depth],
        }
    }

    /// An empty selection sized to a schema.
    pub fn for_schema(schema: &HierarchySchema) -> Self {
        Self::empty(schema.depth())
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.choices.len()
    }

    /// The choice at `rank`, if the rank exists.
    pub fn choice(&self, rank: usize) -> Option<&LevelChoice> {
        self.choices.get(rank)
    }

    /// The selected id at `rank`, or `""` when unselected or out of bounds.
    pub fn id_at(&self, rank: usize) -> &str {
        self.choices.get(rank).map(|c| c.id.as_str()).unwrap_or("")
    }

    /// The resolved name at `rank`, or `""`.
    pub fn name_at(&self, rank: usize) -> &str {
        self.choices
            .get(rank)
            .map(|c| c.name.as_str())
            .unwrap_or("")
    }

    /// Whether `rank` has a selection.
    pub fn is_selected(&self, rank: usize) -> bool {
        self.choices.get(rank).is_some_and(LevelChoice::is_selected)
    }

    /// Rank of the deepest selected level, if any level is selected.
    pub fn deepest_selected(&self) -> Option<usize> {
        self.choices.iter().rposition(LevelChoice::is_selected)
    }

    /// Produce a new selection with `rank` set to `(id, name)` and every
    /// deeper level cleared. An empty `id` clears `rank` itself as well.
    ///
    /// Selecting a non-empty id under an unselected ancestor is rejected:
    /// child options are only ever offered once the parent is chosen, so
    /// such a call indicates a caller bug rather than a user action.
    pub fn with_choice(
        &self,
        rank: usize,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, SelectionError> {
        let depth = self.depth();
        if rank >= depth {
            return Err(SelectionError::RankOutOfBounds { rank, depth });
        }
        let id = id.into();
        if !id.is_empty() {
            if let Some(ancestor) = (0..rank).find(|&r| !self.is_selected(r)) {
                return Err(SelectionError::AncestorUnselected { rank, ancestor });
            }
        }

        let mut next = self.clone();
        if id.is_empty() {
            next.choices[rank] = LevelChoice::default();
        } else {
            next.choices[rank] = LevelChoice {
                id,
                name: name.into(),
            };
        }
        for choice in &mut next.choices[rank + 1..] {
            *choice = LevelChoice::default();
        }
        debug_assert!(next.satisfies_clearing_invariant());
        Ok(next)
    }

    /// Produce a new selection with every level from `rank` down cleared.
    pub fn cleared_from(&self, rank: usize) -> Self {
        let mut next = self.clone();
        for choice in next.choices.iter_mut().skip(rank) {
            *choice = LevelChoice::default();
        }
        next
    }

    /// Check the descendant-clearing invariant: no selected level sits
    /// below an unselected one.
    pub fn satisfies_clearing_invariant(&self) -> bool {
        let mut seen_gap = false;
        for choice in &self.choices {
            if choice.is_selected() {
                if seen_gap {
                    return false;
                }
            } else {
                seen_gap = true;
            }
        }
        true
    }

    /// Render the selection as the flat composite record consumers of the
    /// PMIS exchange: `{ "<key>": id, "<key>Name": name, ... }` for every
    /// level of `schema`.
    pub fn flat_json(&self, schema: &HierarchySchema) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (rank, level) in schema.iter().enumerate() {
            map.insert(
                level.key.clone(),
                serde_json::Value::String(self.id_at(rank).to_string()),
            );
            map.insert(
                format!("{}Name", level.key),
                serde_json::Value::String(self.name_at(rank).to_string()),
            );
        }
        serde_json::Value::Object(map)
    }
}
