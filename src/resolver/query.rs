//! Tier lookup over a [`DimensionIndex`]
//!
//! Every query merges the default table of a dimension with the override
//! table of the requested namespace, then scans the merged list. An unknown
//! namespace falls back to the defaults; an unknown key resolves to no tier.

use crate::formula::EvalError;
use crate::tiers::{
    AsTier, CommandTier, Dimension, DimensionIndex, DimensionKind, KeyedTables, Quote, Scoped, Tier, TierList,
    TierTable,
};
use crate::upgrade::format_command;

/// Merge the tables stored under `key`. `None` when neither scope configures the key.
fn keyed_tiers<'a, K: Ord, T: AsTier>(
    scoped: &'a Scoped<KeyedTables<K, T>>,
    key: &K,
    namespace: &str,
) -> Option<TierList<'a, T>> {
    let defaults = scoped.default.get(key);
    let overrides = scoped.get(namespace).and_then(|tables| tables.get(key));
    if defaults.is_none() && overrides.is_none() {
        return None;
    }
    Some(TierTable::merge(defaults, overrides))
}

/// Keys configured in the default scope or in the namespace scope
fn keyed_ids<'a, K: Ord, T>(scoped: &'a Scoped<KeyedTables<K, T>>, namespace: &str) -> Vec<&'a K> {
    let mut keys: Vec<&K> = scoped.default.keys().collect();
    if let Some(tables) = scoped.get(namespace) {
        keys.extend(tables.keys());
    }
    keys.sort();
    keys.dedup();
    keys
}

impl DimensionIndex {
    /// Merged tiers of one dimension in `namespace`, ascending by `max_level`
    pub fn tiers(&self, dimension: &Dimension, namespace: &str) -> TierList<'_, Tier> {
        let list = match dimension {
            Dimension::Range => Some(TierTable::merge(Some(&self.range.default), self.range.get(namespace))),
            Dimension::BlockLimit(material) => keyed_tiers(&self.blocks, material, namespace),
            Dimension::EntityLimit(entity) => keyed_tiers(&self.entities, entity, namespace),
            Dimension::GroupLimit(group) => keyed_tiers(&self.groups, group, namespace),
            Dimension::CommandLimit(command) => keyed_tiers(&self.commands, command, namespace)
                .map(|list| TierList::new(list.iter().map(AsTier::tier).collect())),
        };
        list.unwrap_or_else(TierList::empty)
    }

    /// Merged command tiers of one command in `namespace`
    pub fn command_tiers(&self, command: &str, namespace: &str) -> TierList<'_, CommandTier> {
        keyed_tiers(&self.commands, &command.to_string(), namespace).unwrap_or_else(TierList::empty)
    }

    /// Every dimension of `kind` with tiers in `namespace`, each with its merged tier list
    pub fn all_tiers(&self, kind: DimensionKind, namespace: &str) -> Vec<(Dimension, TierList<'_, Tier>)> {
        self.managed(kind, namespace)
            .into_iter()
            .map(|dim| {
                let list = self.tiers(&dim, namespace);
                (dim, list)
            })
            .collect()
    }

    /// Dimensions of `kind` that have a tier table in `namespace` or in the defaults
    pub fn managed(&self, kind: DimensionKind, namespace: &str) -> Vec<Dimension> {
        match kind {
            DimensionKind::Range => {
                if self.tiers(&Dimension::Range, namespace).is_empty() {
                    Vec::new()
                } else {
                    vec![Dimension::Range]
                }
            }
            DimensionKind::BlockLimit => keyed_ids(&self.blocks, namespace)
                .into_iter()
                .map(|m| Dimension::BlockLimit(m.clone()))
                .collect(),
            DimensionKind::EntityLimit => keyed_ids(&self.entities, namespace)
                .into_iter()
                .map(|e| Dimension::EntityLimit(e.clone()))
                .collect(),
            DimensionKind::GroupLimit => keyed_ids(&self.groups, namespace)
                .into_iter()
                .map(|g| Dimension::GroupLimit(g.clone()))
                .collect(),
            DimensionKind::CommandLimit => keyed_ids(&self.commands, namespace)
                .into_iter()
                .map(|c| Dimension::CommandLimit(c.clone()))
                .collect(),
        }
    }

    /// Whether upgrades manage `dimension` in `namespace`
    pub fn is_managed(&self, dimension: &Dimension, namespace: &str) -> bool {
        !self.tiers(dimension, namespace).is_empty()
    }

    /// Tier that applies at `level`, or `None` when fully upgraded or unconfigured
    pub fn resolve_tier(&self, dimension: &Dimension, namespace: &str, level: i64) -> Option<&Tier> {
        self.tiers(dimension, namespace).select(level)
    }

    pub fn resolve_command_tier(&self, command: &str, namespace: &str, level: i64) -> Option<&CommandTier> {
        self.command_tiers(command, namespace).select(level)
    }

    /// Evaluate the tier at `level`. `Ok(None)` means no further upgrade.
    pub fn quote(
        &self,
        dimension: &Dimension,
        namespace: &str,
        level: i64,
        island_level: i64,
        players: i64,
    ) -> Result<Option<Quote>, EvalError> {
        match self.resolve_tier(dimension, namespace, level) {
            Some(tier) => tier.quote(level, island_level, players).map(Some),
            None => Ok(None),
        }
    }

    /// Highest `max_level` recorded for the dimension: the namespace value if
    /// present, else the default value, else 0
    pub fn max_level(&self, dimension: &Dimension, namespace: &str) -> i64 {
        self.max_levels
            .get(namespace)
            .and_then(|levels| levels.get(dimension))
            .or_else(|| self.max_levels.default.get(dimension))
            .copied()
            .unwrap_or(0)
    }

    pub fn tier_name(&self, dimension: &Dimension, namespace: &str, level: i64) -> Option<&str> {
        self.resolve_tier(dimension, namespace, level)
            .map(|tier| tier.tier_name.as_str())
    }

    /// Permission level of the tier at `level` (0 when no tier applies)
    pub fn permission_level(&self, dimension: &Dimension, namespace: &str, level: i64) -> i32 {
        self.resolve_tier(dimension, namespace, level)
            .map(|tier| tier.permission_level)
            .unwrap_or(0)
    }

    /// Formatted commands of the tier at `level` (empty when no tier applies)
    pub fn command_list(&self, command: &str, namespace: &str, level: i64, player: &str, owner: &str) -> Vec<String> {
        self.resolve_command_tier(command, namespace, level)
            .map(|tier| {
                tier.commands
                    .iter()
                    .map(|template| format_command(template, player, level, owner))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn runs_as_console(&self, command: &str, namespace: &str, level: i64) -> bool {
        self.resolve_command_tier(command, namespace, level)
            .map(|tier| tier.run_as_console)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse;
    use crate::tiers::{Material, UNBOUNDED};

    fn make_tier(id: &str, max_level: i64, cost: &str) -> Tier {
        Tier {
            effect: parse("[level] + 1").unwrap(),
            cost: parse(cost).unwrap(),
            ..Tier::new(id, max_level)
        }
    }

    fn make_index() -> DimensionIndex {
        let mut index = DimensionIndex::new();
        index.range.default.insert(make_tier("t1", 5, "100"));
        index.range.default.insert(make_tier("t2", 10, "200"));
        index.range.scope_mut(Some("AcidIsland")).insert(make_tier("t1", 3, "50"));
        index.record_max_level(&Dimension::Range, None, 10);
        index.record_max_level(&Dimension::Range, Some("AcidIsland"), 3);

        let hopper = Material::new("HOPPER");
        let mut hopper_tiers = TierTable::new();
        hopper_tiers.insert(make_tier("h1", 2, "[level] * 10"));
        hopper_tiers.insert(make_tier("h2", UNBOUNDED, "1000"));
        index.blocks.default.insert(hopper.clone(), hopper_tiers);
        index.record_max_level(&Dimension::BlockLimit(hopper), None, 2);

        let mut fly = TierTable::new();
        fly.insert(CommandTier {
            tier: Tier::new("f1", 1),
            commands: vec!["fly [player]".into(), "say [owner] bought level [level]".into()],
            run_as_console: true,
        });
        index.commands.default.insert("fly".into(), fly);
        index
    }

    #[test]
    fn test_unknown_namespace_falls_back_to_defaults() {
        let index = make_index();
        let tier = index.resolve_tier(&Dimension::Range, "Unknown", 4).unwrap();
        assert_eq!(tier.id, "t1");
        assert_eq!(tier.max_level, 5);
    }

    #[test]
    fn test_namespace_override_by_id() {
        let index = make_index();
        assert_eq!(index.resolve_tier(&Dimension::Range, "AcidIsland", 3).unwrap().id, "t1");
        assert_eq!(index.resolve_tier(&Dimension::Range, "AcidIsland", 4).unwrap().id, "t2");
        assert!(index.resolve_tier(&Dimension::Range, "AcidIsland", 11).is_none());
    }

    #[test]
    fn test_unconfigured_key_has_no_tier() {
        let index = make_index();
        let dim = Dimension::BlockLimit(Material::new("DIAMOND_BLOCK"));
        assert!(index.resolve_tier(&dim, "BSkyBlock", 0).is_none());
        assert_eq!(index.quote(&dim, "BSkyBlock", 0, 0, 1), Ok(None));
        assert!(!index.is_managed(&dim, "BSkyBlock"));
    }

    #[test]
    fn test_empty_dimension_never_resolves() {
        let index = DimensionIndex::new();
        for level in [0, 1, 100] {
            assert!(index.resolve_tier(&Dimension::Range, "BSkyBlock", level).is_none());
        }
        assert!(index.managed(DimensionKind::Range, "BSkyBlock").is_empty());
    }

    #[test]
    fn test_quote_evaluates_selected_tier() {
        let index = make_index();
        let hopper = Dimension::BlockLimit(Material::new("hopper"));
        let quote = index.quote(&hopper, "BSkyBlock", 2, 0, 1).unwrap().unwrap();
        assert_eq!(quote.cost, 20.0);
        assert_eq!(quote.effect, 3.0);

        let quote = index.quote(&hopper, "BSkyBlock", 50, 0, 1).unwrap().unwrap();
        assert_eq!(quote.cost, 1000.0);
    }

    #[test]
    fn test_max_level_fallbacks() {
        let index = make_index();
        assert_eq!(index.max_level(&Dimension::Range, "AcidIsland"), 3);
        assert_eq!(index.max_level(&Dimension::Range, "BSkyBlock"), 10);
        assert_eq!(index.max_level(&Dimension::GroupLimit("none".into()), "BSkyBlock"), 0);
    }

    #[test]
    fn test_keyed_max_level_falls_back_per_key() {
        let mut index = make_index();
        let spawner = Dimension::BlockLimit(Material::new("SPAWNER"));
        index.record_max_level(&spawner, Some("AcidIsland"), 4);

        // AcidIsland only overrides SPAWNER, so HOPPER keeps its default tiers and maximum
        let hopper = Dimension::BlockLimit(Material::new("HOPPER"));
        assert_eq!(index.max_level(&spawner, "AcidIsland"), 4);
        assert_eq!(index.max_level(&hopper, "AcidIsland"), 2);
        assert_eq!(index.resolve_tier(&hopper, "AcidIsland", 0).unwrap().id, "h1");
    }

    #[test]
    fn test_command_queries() {
        let index = make_index();
        assert_eq!(
            index.command_list("fly", "BSkyBlock", 1, "Alice", "Bob"),
            vec!["fly Alice".to_string(), "say Bob bought level 1".to_string()]
        );
        assert!(index.runs_as_console("fly", "BSkyBlock", 0));
        assert!(index.command_list("fly", "BSkyBlock", 2, "Alice", "Bob").is_empty());
        assert!(!index.runs_as_console("fly", "BSkyBlock", 2));
        assert_eq!(index.tier_name(&Dimension::CommandLimit("fly".into()), "BSkyBlock", 0), Some("f1"));
    }

    #[test]
    fn test_managed_lists_keys() {
        let index = make_index();
        assert_eq!(
            index.managed(DimensionKind::BlockLimit, "BSkyBlock"),
            vec![Dimension::BlockLimit(Material::new("HOPPER"))]
        );
        let all = index.all_tiers(DimensionKind::CommandLimit, "BSkyBlock");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].1.ids(), vec!["f1"]);
    }

    #[test]
    fn test_permission_level_defaults_to_zero() {
        let mut index = make_index();
        let mut tier = make_tier("p", 1, "0");
        tier.permission_level = 3;
        index.groups.default.insert("animals".into(), std::iter::once(tier).collect());

        let dim = Dimension::GroupLimit("animals".into());
        assert_eq!(index.permission_level(&dim, "BSkyBlock", 0), 3);
        assert_eq!(index.permission_level(&dim, "BSkyBlock", 2), 0);
    }
}
