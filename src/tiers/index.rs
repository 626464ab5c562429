//! Dimension index
//!
//! All tier tables of a loaded configuration, split into the default scope and
//! per-namespace (game mode) override scopes. An index is built once by the
//! config builder and is read-only afterwards; a reload builds a new one.

use std::collections::{BTreeMap, BTreeSet};

use super::dimension::{Dimension, EntityKind, Material};
use super::table::TierTable;
use super::tier::{CommandTier, Tier};

/// Tier tables keyed by the dimension key (material, entity, group, command)
pub type KeyedTables<K, T> = BTreeMap<K, TierTable<T>>;

/// A value in the default scope plus optional per-namespace overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Scoped<T> {
    pub default: T,
    pub namespaces: BTreeMap<String, T>,
}

impl<T: Default> Default for Scoped<T> {
    fn default() -> Self {
        Self {
            default: T::default(),
            namespaces: BTreeMap::new(),
        }
    }
}

impl<T: Default> Scoped<T> {
    /// Override scope for `namespace`, if one was configured
    pub fn get(&self, namespace: &str) -> Option<&T> {
        self.namespaces.get(namespace)
    }

    /// Mutable scope: the default scope for `None`, else the namespace scope (created on demand)
    pub fn scope_mut(&mut self, namespace: Option<&str>) -> &mut T {
        match namespace {
            None => &mut self.default,
            Some(ns) => self.namespaces.entry(ns.to_string()).or_default(),
        }
    }
}

/// Every tier table of one configuration load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionIndex {
    pub(crate) disabled_namespaces: BTreeSet<String>,
    pub(crate) range: Scoped<TierTable<Tier>>,
    pub(crate) blocks: Scoped<KeyedTables<Material, Tier>>,
    pub(crate) entities: Scoped<KeyedTables<EntityKind, Tier>>,
    pub(crate) groups: Scoped<KeyedTables<String, Tier>>,
    pub(crate) commands: Scoped<KeyedTables<String, CommandTier>>,
    /// Running maximum `max_level` per dimension, per scope
    pub(crate) max_levels: Scoped<BTreeMap<Dimension, i64>>,
    pub(crate) entity_icons: BTreeMap<EntityKind, Material>,
    pub(crate) group_icons: BTreeMap<String, Material>,
    pub(crate) command_icons: BTreeMap<String, Material>,
    pub(crate) command_names: BTreeMap<String, String>,
}

impl DimensionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether upgrades are offered in `namespace`
    pub fn is_enabled(&self, namespace: &str) -> bool {
        !self.disabled_namespaces.contains(namespace)
    }

    pub fn disabled_namespaces(&self) -> impl Iterator<Item = &str> {
        self.disabled_namespaces.iter().map(String::as_str)
    }

    /// Namespaces with at least one override section
    pub fn namespaces(&self) -> BTreeSet<&str> {
        self.range
            .namespaces
            .keys()
            .chain(self.blocks.namespaces.keys())
            .chain(self.entities.namespaces.keys())
            .chain(self.groups.namespaces.keys())
            .chain(self.commands.namespaces.keys())
            .map(String::as_str)
            .collect()
    }

    /// Whether any range tier is configured in any scope
    pub fn has_range_upgrade(&self) -> bool {
        !self.range.default.is_empty() || self.range.namespaces.values().any(|t| !t.is_empty())
    }

    pub fn entity_icon(&self, entity: &EntityKind) -> Option<&Material> {
        self.entity_icons.get(entity)
    }

    pub fn group_icon(&self, group: &str) -> Option<&Material> {
        self.group_icons.get(group)
    }

    pub fn command_icon(&self, command: &str) -> Option<&Material> {
        self.command_icons.get(command)
    }

    /// Display name of a command upgrade (the command id unless configured)
    pub fn command_name(&self, command: &str) -> Option<&str> {
        self.command_names.get(command).map(String::as_str)
    }

    /// Raise the running maximum for `dimension` in a scope
    pub(crate) fn record_max_level(&mut self, dimension: &Dimension, namespace: Option<&str>, max_level: i64) {
        self.max_levels
            .scope_mut(namespace)
            .entry(dimension.clone())
            .and_modify(|current| *current = (*current).max(max_level))
            .or_insert(max_level);
    }
}
