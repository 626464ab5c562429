//! Tier tables and level lookup
//!
//! A [`TierTable`] holds the tiers of one dimension in one config scope,
//! keyed by tier id. Lookups merge the default table with a namespace
//! override table and scan the result in ascending `max_level` order.

use std::collections::BTreeMap;

use super::tier::{AsTier, Tier};

/// Tiers of one dimension in one scope, keyed by tier id
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable<T> {
    tiers: BTreeMap<String, T>,
}

impl<T> Default for TierTable<T> {
    fn default() -> Self {
        Self { tiers: BTreeMap::new() }
    }
}

impl<T: AsTier> TierTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tier under its own id, replacing any tier with the same id
    pub fn insert(&mut self, tier: T) -> Option<T> {
        let id = tier.tier().id.clone();
        self.tiers.insert(id, tier)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.tiers.get(id)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tiers.values()
    }

    /// Highest `max_level` in the table, if any
    pub fn max_level(&self) -> Option<i64> {
        self.iter().map(|t| t.tier().max_level).max()
    }

    /// Merge `defaults` with `overrides`: the union of both id sets, where an
    /// id present in `overrides` takes the override tier. An absent or empty
    /// override table leaves the defaults unchanged.
    pub fn merge<'a>(defaults: Option<&'a Self>, overrides: Option<&'a Self>) -> TierList<'a, T> {
        let mut merged: BTreeMap<&'a str, &'a T> = BTreeMap::new();
        if let Some(defaults) = defaults {
            merged.extend(defaults.tiers.iter().map(|(id, tier)| (id.as_str(), tier)));
        }
        if let Some(overrides) = overrides {
            merged.extend(overrides.tiers.iter().map(|(id, tier)| (id.as_str(), tier)));
        }
        TierList::new(merged.into_values().collect())
    }
}

impl<T: AsTier> FromIterator<T> for TierTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = Self::new();
        for tier in iter {
            table.insert(tier);
        }
        table
    }
}

/// Merged tiers sorted ascending by `max_level`, unbounded tiers first
#[derive(Debug, Clone)]
pub struct TierList<'a, T> {
    tiers: Vec<&'a T>,
}

impl<'a, T: AsTier> TierList<'a, T> {
    /// Sort with a stable sort, so equal ceilings keep their merge order (by tier id)
    pub fn new(mut tiers: Vec<&'a T>) -> Self {
        tiers.sort_by_key(|t| t.tier().max_level);
        Self { tiers }
    }

    pub fn empty() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Tier that applies to `level`.
    ///
    /// The first bounded tier whose ceiling is at or above `level` wins. When
    /// the level is past every bounded ceiling, the first unbounded tier is the
    /// fallback. `None` means the dimension is fully upgraded.
    pub fn select(&self, level: i64) -> Option<&'a T> {
        self.tiers
            .iter()
            .find(|t| {
                let tier = t.tier();
                !tier.is_unbounded() && tier.covers(level)
            })
            .or_else(|| self.tiers.iter().find(|t| t.tier().is_unbounded()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.tiers.iter().copied()
    }

    /// Tier ids in sorted order
    pub fn ids(&self) -> Vec<&'a str> {
        self.tiers.iter().copied().map(|t| t.tier().id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiers::tier::UNBOUNDED;

    fn make_table(tiers: &[(&str, i64)]) -> TierTable<Tier> {
        tiers.iter().map(|(id, max)| Tier::new(id, *max)).collect()
    }

    #[test]
    fn test_select_smallest_covering_ceiling() {
        let table = make_table(&[("a", 5), ("b", 10), ("c", UNBOUNDED)]);
        let list = TierTable::merge(Some(&table), None);

        assert_eq!(list.ids(), vec!["c", "a", "b"]);
        assert_eq!(list.select(0).unwrap().id, "a");
        assert_eq!(list.select(5).unwrap().id, "a");
        assert_eq!(list.select(7).unwrap().id, "b");
        assert_eq!(list.select(11).unwrap().id, "c");
    }

    #[test]
    fn test_select_past_last_ceiling_without_unbounded() {
        let table = make_table(&[("a", 5), ("b", 10)]);
        let list = TierTable::merge(Some(&table), None);

        assert_eq!(list.select(7).unwrap().id, "b");
        assert!(list.select(11).is_none());
    }

    #[test]
    fn test_only_unbounded_always_matches() {
        let table = make_table(&[("forever", UNBOUNDED)]);
        let list = TierTable::merge(Some(&table), None);
        assert_eq!(list.select(0).unwrap().id, "forever");
        assert_eq!(list.select(9_999).unwrap().id, "forever");
    }

    #[test]
    fn test_empty_never_matches() {
        let table: TierTable<Tier> = TierTable::new();
        let list = TierTable::merge(Some(&table), None);
        assert!(list.select(0).is_none());
        assert!(TierList::<Tier>::empty().select(0).is_none());
    }

    #[test]
    fn test_merge_override_wins_by_id() {
        let defaults = make_table(&[("t1", 5), ("t2", 10)]);
        let overrides = make_table(&[("t1", 3)]);
        let list = TierTable::merge(Some(&defaults), Some(&overrides));

        assert_eq!(list.len(), 2);
        assert_eq!(list.ids(), vec!["t1", "t2"]);
        let t1 = list.iter().find(|t| t.id == "t1").unwrap();
        assert_eq!(t1.max_level, 3);
        let t2 = list.iter().find(|t| t.id == "t2").unwrap();
        assert_eq!(t2.max_level, 10);
    }

    #[test]
    fn test_merge_with_empty_override_uses_defaults() {
        let defaults = make_table(&[("t1", 5)]);
        let overrides = TierTable::new();
        let list = TierTable::merge(Some(&defaults), Some(&overrides));
        assert_eq!(list.ids(), vec!["t1"]);
    }

    #[test]
    fn test_override_only() {
        let overrides = make_table(&[("x", 4)]);
        let list = TierTable::merge(None, Some(&overrides));
        assert_eq!(list.select(4).unwrap().id, "x");
    }

    #[test]
    fn test_equal_ceilings_keep_id_order() {
        let table = make_table(&[("beta", 5), ("alpha", 5)]);
        let list = TierTable::merge(Some(&table), None);
        assert_eq!(list.select(1).unwrap().id, "alpha");
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut table = make_table(&[("a", 1)]);
        let old = table.insert(Tier::new("a", 9));
        assert_eq!(old.map(|t| t.max_level), Some(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.max_level(), Some(9));
    }
}
