//! # Hierarchy Schemas — Level Definitions and Validation
//!
//! A selection hierarchy is a fixed-depth, totally ordered list of levels
//! (e.g. Zone → Circle → Division → SubDivision). Each [`LevelDef`] names
//! the REST collection its options live in and, for every level below the
//! root, the query field that scopes a flat listing to a parent id.
//!
//! ## Validation
//!
//! [`HierarchySchema::new`] rejects malformed hierarchies at construction:
//! empty level lists, duplicate keys, a parent filter on the root level, or
//! a missing parent filter on a deeper level. Downstream code can therefore
//! index levels by rank without re-checking shape.
//!
//! ## Preset Schemas
//!
//! The PMIS carries four instantiations of the cascade pattern. All four
//! are provided as constructors so callers never hand-assemble the common
//! cases: [`HierarchySchema::engineering`], [`HierarchySchema::geography`],
//! [`HierarchySchema::classification`], [`HierarchySchema::site_location`].

use serde::{Deserialize, Serialize};

/// Errors from hierarchy schema construction.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema must contain at least one level.
    #[error("hierarchy schema must contain at least one level")]
    Empty,

    /// Two levels share the same key.
    #[error("duplicate level key: {key}")]
    DuplicateKey {
        /// The offending key.
        key: String,
    },

    /// The root level carries a parent filter field.
    #[error("root level {key} must not declare a parent filter field")]
    RootHasParentField {
        /// Key of the root level.
        key: String,
    },

    /// A non-root level is missing its parent filter field.
    #[error("level {key} at rank {rank} must declare a parent filter field")]
    MissingParentField {
        /// Key of the offending level.
        key: String,
        /// Rank of the offending level.
        rank: usize,
    },

    /// A level key, label, or collection is blank.
    #[error("level at rank {rank} has a blank {field}")]
    BlankField {
        /// Rank of the offending level.
        rank: usize,
        /// Which field was blank (`key`, `label`, or `collection`).
        field: &'static str,
    },
}

/// One rank in a selection hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    /// Stable identifier for the level (e.g. `"zone"`). Used as the field
    /// name in serialized selections and in cascade events.
    pub key: String,
    /// Human-readable label for the level (e.g. `"Zone"`).
    pub label: String,
    /// REST collection holding this level's options (e.g. `"zones"`).
    pub collection: String,
    /// Query field that scopes a flat listing of this collection to a
    /// parent id (e.g. `"zone"` for circles). `None` for the root level.
    pub parent_field: Option<String>,
}

impl LevelDef {
    /// Root level: no parent dependency, always fetchable.
    pub fn root(key: impl Into<String>, label: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            collection: collection.into(),
            parent_field: None,
        }
    }

    /// Dependent level: options are meaningful only under a parent id.
    pub fn child(
        key: impl Into<String>,
        label: impl Into<String>,
        collection: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            collection: collection.into(),
            parent_field: Some(parent_field.into()),
        }
    }
}

/// A validated, fixed-depth selection hierarchy.
///
/// Levels are totally ordered by rank; rank 0 is the root. The struct is
/// immutable after construction — every consumer may rely on the shape
/// checks performed in [`HierarchySchema::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchySchema {
    levels: Vec<LevelDef>,
}

impl HierarchySchema {
    /// Build a schema from an ordered list of level definitions.
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, SchemaError> {
        if levels.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (rank, level) in levels.iter().enumerate() {
            if level.key.trim().is_empty() {
                return Err(SchemaError::BlankField { rank, field: "key" });
            }
            if level.label.trim().is_empty() {
                return Err(SchemaError::BlankField { rank, field: "label" });
            }
            if level.collection.trim().is_empty() {
                return Err(SchemaError::BlankField { rank, field: "collection" });
            }
            if levels[..rank].iter().any(|l| l.key == level.key) {
                return Err(SchemaError::DuplicateKey {
                    key: level.key.clone(),
                });
            }
            match (rank, &level.parent_field) {
                (0, Some(_)) => {
                    return Err(SchemaError::RootHasParentField {
                        key: level.key.clone(),
                    })
                }
                (0, None) => {}
                (_, None) => {
                    return Err(SchemaError::MissingParentField {
                        key: level.key.clone(),
                        rank,
                    })
                }
                (_, Some(_)) => {}
            }
        }
        Ok(Self { levels })
    }

    /// Number of levels in the hierarchy.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Rank of the deepest level.
    pub fn deepest(&self) -> usize {
        self.levels.len() - 1
    }

    /// Level definition at `rank`, if it exists.
    pub fn level(&self, rank: usize) -> Option<&LevelDef> {
        self.levels.get(rank)
    }

    /// Rank of the level with the given key, if present.
    pub fn rank_of(&self, key: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.key == key)
    }

    /// Iterate over levels in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }

    /// Engineering hierarchy: Zone → Circle → Division → SubDivision.
    pub fn engineering() -> Self {
        // Constructed from literals; the shape checks cannot fail here.
        Self {
            levels: vec![
                LevelDef::root("zone", "Zone", "zones"),
                LevelDef::child("circle", "Circle", "circles", "zone"),
                LevelDef::child("division", "Division", "divisions", "circle"),
                LevelDef::child("subDivision", "Sub Division", "sub-divisions", "division"),
            ],
        }
    }

    /// Geography hierarchy: District → Tehsil.
    pub fn geography() -> Self {
        Self {
            levels: vec![
                LevelDef::root("district", "District", "districts"),
                LevelDef::child("tehsil", "Tehsil", "tehsils", "district"),
            ],
        }
    }

    /// Work classification: a single independent list (sector of work).
    /// Independent selects are depth-1 hierarchies; chaining several of
    /// them is just several schemas side by side.
    pub fn classification() -> Self {
        Self {
            levels: vec![LevelDef::root("sector", "Sector", "work-sectors")],
        }
    }

    /// Site location hierarchy used by contractor onboarding:
    /// Province → District → Tehsil → Site.
    pub fn site_location() -> Self {
        Self {
            levels: vec![
                LevelDef::root("province", "Province", "provinces"),
                LevelDef::child("district", "District", "districts", "province"),
                LevelDef::child("tehsil", "Tehsil", "tehsils", "district"),
                LevelDef::child("site", "Site", "sites", "tehsil"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty() {
        let result = HierarchySchema::new(vec![]);
        assert!(matches!(result.unwrap_err(), SchemaError::Empty));
    }

    #[test]
    fn new_rejects_duplicate_keys() {
        let result = HierarchySchema::new(vec![
            LevelDef::root("zone", "Zone", "zones"),
            LevelDef::child("zone", "Zone Again", "zones2", "zone"),
        ]);
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::DuplicateKey { key } if key == "zone"
        ));
    }

    #[test]
    fn new_rejects_root_with_parent_field() {
        let result = HierarchySchema::new(vec![LevelDef::child("zone", "Zone", "zones", "x")]);
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::RootHasParentField { key } if key == "zone"
        ));
    }

    #[test]
    fn new_rejects_child_without_parent_field() {
        let result = HierarchySchema::new(vec![
            LevelDef::root("zone", "Zone", "zones"),
            LevelDef::root("circle", "Circle", "circles"),
        ]);
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::MissingParentField { rank: 1, .. }
        ));
    }

    #[test]
    fn new_rejects_blank_collection() {
        let result = HierarchySchema::new(vec![LevelDef::root("zone", "Zone", "  ")]);
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::BlankField { rank: 0, field: "collection" }
        ));
    }

    #[test]
    fn engineering_schema_shape() {
        let schema = HierarchySchema::engineering();
        assert_eq!(schema.depth(), 4);
        assert_eq!(schema.deepest(), 3);
        assert_eq!(schema.level(0).unwrap().key, "zone");
        assert_eq!(schema.level(3).unwrap().key, "subDivision");
        assert_eq!(
            schema.level(1).unwrap().parent_field.as_deref(),
            Some("zone")
        );
    }

    #[test]
    fn geography_schema_shape() {
        let schema = HierarchySchema::geography();
        assert_eq!(schema.depth(), 2);
        assert_eq!(schema.level(1).unwrap().collection, "tehsils");
    }

    #[test]
    fn classification_is_single_level() {
        let schema = HierarchySchema::classification();
        assert_eq!(schema.depth(), 1);
        assert!(schema.level(0).unwrap().parent_field.is_none());
    }

    #[test]
    fn site_location_schema_shape() {
        let schema = HierarchySchema::site_location();
        assert_eq!(schema.depth(), 4);
        assert_eq!(schema.rank_of("tehsil"), Some(2));
    }

    #[test]
    fn rank_of_unknown_key_is_none() {
        let schema = HierarchySchema::engineering();
        assert_eq!(schema.rank_of("district"), None);
    }

    #[test]
    fn schema_serde_roundtrip() {
        let schema = HierarchySchema::engineering();
        let json = serde_json::to_string(&schema).expect("serialize");
        let back: HierarchySchema = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, schema);
    }
}
