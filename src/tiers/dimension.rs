//! Upgrade dimensions
//!
//! A dimension is one independently progressing upgrade axis: the island
//! range, the limit of one block type, one entity type, one entity group, or
//! one configured command.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block or item material id, always upper-case (e.g. `HOPPER`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Material(String);

impl Material {
    pub fn new(name: &str) -> Self {
        Self(name.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entity type id, always upper-case (e.g. `COW`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKind(String);

impl EntityKind {
    pub fn new(name: &str) -> Self {
        Self(name.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five kinds of upgrade dimension, without their keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DimensionKind {
    Range,
    BlockLimit,
    EntityLimit,
    GroupLimit,
    CommandLimit,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 5] = [
        DimensionKind::Range,
        DimensionKind::BlockLimit,
        DimensionKind::EntityLimit,
        DimensionKind::GroupLimit,
        DimensionKind::CommandLimit,
    ];

    /// Config section holding this kind's tiers
    pub fn section_name(&self) -> &'static str {
        match self {
            DimensionKind::Range => "range-upgrade",
            DimensionKind::BlockLimit => "block-limits-upgrade",
            DimensionKind::EntityLimit => "entity-limits-upgrade",
            DimensionKind::GroupLimit => "entity-group-limits-upgrade",
            DimensionKind::CommandLimit => "command-upgrade",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "range" | "range-upgrade" => Some(DimensionKind::Range),
            "block" | "block-limits-upgrade" => Some(DimensionKind::BlockLimit),
            "entity" | "entity-limits-upgrade" => Some(DimensionKind::EntityLimit),
            "group" | "entity-group-limits-upgrade" => Some(DimensionKind::GroupLimit),
            "command" | "command-upgrade" => Some(DimensionKind::CommandLimit),
            _ => None,
        }
    }

    /// Whether dimensions of this kind need a lookup key
    pub fn is_keyed(&self) -> bool {
        !matches!(self, DimensionKind::Range)
    }
}

/// One upgrade dimension together with its lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Range,
    BlockLimit(Material),
    EntityLimit(EntityKind),
    GroupLimit(String),
    CommandLimit(String),
}

impl Dimension {
    /// Build a dimension from a kind and an optional key. Keyed kinds require a key.
    pub fn from_parts(kind: DimensionKind, key: Option<&str>) -> Option<Self> {
        match (kind, key) {
            (DimensionKind::Range, _) => Some(Dimension::Range),
            (DimensionKind::BlockLimit, Some(key)) => Some(Dimension::BlockLimit(Material::new(key))),
            (DimensionKind::EntityLimit, Some(key)) => Some(Dimension::EntityLimit(EntityKind::new(key))),
            (DimensionKind::GroupLimit, Some(key)) => Some(Dimension::GroupLimit(key.to_string())),
            (DimensionKind::CommandLimit, Some(key)) => Some(Dimension::CommandLimit(key.to_string())),
            (_, None) => None,
        }
    }

    pub fn kind(&self) -> DimensionKind {
        match self {
            Dimension::Range => DimensionKind::Range,
            Dimension::BlockLimit(_) => DimensionKind::BlockLimit,
            Dimension::EntityLimit(_) => DimensionKind::EntityLimit,
            Dimension::GroupLimit(_) => DimensionKind::GroupLimit,
            Dimension::CommandLimit(_) => DimensionKind::CommandLimit,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Dimension::Range => None,
            Dimension::BlockLimit(mat) => Some(mat.as_str()),
            Dimension::EntityLimit(ent) => Some(ent.as_str()),
            Dimension::GroupLimit(group) => Some(group),
            Dimension::CommandLimit(cmd) => Some(cmd),
        }
    }

    /// Name under which progress for this dimension is stored
    pub fn upgrade_name(&self) -> String {
        match self {
            Dimension::Range => "RangeUpgrade".to_string(),
            Dimension::BlockLimit(mat) => format!("LimitsUpgrade-{}", mat),
            Dimension::EntityLimit(ent) => format!("LimitsUpgrade-{}", ent),
            Dimension::GroupLimit(group) => format!("LimitsUpgrade-{}", group),
            Dimension::CommandLimit(cmd) => format!("command-{}", cmd),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(f, "{:?}({})", self.kind(), key),
            None => write!(f, "{:?}", self.kind()),
        }
    }
}
