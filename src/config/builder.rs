//! Builds a [`DimensionIndex`] from a configuration tree
//!
//! Bad entries (unknown materials, entities without an icon, commands without
//! an icon, malformed formulas, missing fields) are logged and skipped; the
//! rest of the configuration still loads.

use std::collections::BTreeMap;

use crate::formula::{parse, Expression, STANDARD_VARS};
use crate::tiers::{
    AsTier, CommandTier, Dimension, DimensionIndex, DimensionKind, Material, Tier, TierTable, UNBOUNDED,
};

use super::catalog::Catalog;
use super::error::ConfigError;
use super::section::ConfigSection;

/// Accumulates one [`DimensionIndex`] and the diagnostics of its load
pub struct IndexBuilder<'c> {
    catalog: &'c dyn Catalog,
    index: DimensionIndex,
    diagnostics: Vec<ConfigError>,
}

impl<'c> IndexBuilder<'c> {
    pub fn new(catalog: &'c dyn Catalog) -> Self {
        let mut index = DimensionIndex::new();
        // The default range maximum starts at 0, so an unbounded-only range reports 0
        index.max_levels.default.insert(Dimension::Range, 0);
        Self {
            catalog,
            index,
            diagnostics: Vec::new(),
        }
    }

    /// Load every section of `root` and return the index plus the skipped entries
    pub fn build(mut self, root: &ConfigSection<'_>) -> (DimensionIndex, Vec<ConfigError>) {
        self.index.disabled_namespaces = root.get_string_list("disabled-gamemodes").into_iter().collect();

        if let Some(section) = self.section(root, DimensionKind::Range.section_name()) {
            self.load_range(&section, None);
        }
        if let Some(section) = self.section(root, DimensionKind::BlockLimit.section_name()) {
            self.load_blocks(&section, None);
        }
        if let Some(section) = self.section(root, "entity-icon") {
            self.load_entity_icons(&section);
        }
        if let Some(section) = self.section(root, "entity-group-icon") {
            self.index.group_icons = self.load_icons(&section);
        }
        if let Some(section) = self.section(root, DimensionKind::EntityLimit.section_name()) {
            self.load_entities(&section, None);
        }
        if let Some(section) = self.section(root, DimensionKind::GroupLimit.section_name()) {
            self.load_groups(&section, None);
        }
        if let Some(section) = self.section(root, "command-icon") {
            self.index.command_icons = self.load_icons(&section);
        }
        if let Some(section) = self.section(root, DimensionKind::CommandLimit.section_name()) {
            self.load_commands(&section, None);
        }
        if let Some(section) = self.section(root, "gamemodes") {
            self.load_namespaces(&section);
        }

        log::info!(
            "Loaded upgrade config: {} namespace override(s), {} entries skipped",
            self.index.namespaces().len(),
            self.diagnostics.len()
        );
        (self.index, self.diagnostics)
    }

    fn report(&mut self, err: ConfigError) {
        log::error!("Config: {}", err);
        self.diagnostics.push(err);
    }

    /// Optional child section; a non-map value is reported and treated as absent
    fn section<'a>(&mut self, parent: &ConfigSection<'a>, key: &str) -> Option<ConfigSection<'a>> {
        match parent.optional_child(key) {
            Ok(section) => section,
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    fn load_namespaces(&mut self, section: &ConfigSection<'_>) {
        for namespace in section.keys() {
            let Some(overrides) = self.section(section, namespace) else {
                continue;
            };
            let ns = Some(namespace);
            if let Some(s) = self.section(&overrides, DimensionKind::Range.section_name()) {
                self.load_range(&s, ns);
            }
            if let Some(s) = self.section(&overrides, DimensionKind::BlockLimit.section_name()) {
                self.load_blocks(&s, ns);
            }
            if let Some(s) = self.section(&overrides, DimensionKind::EntityLimit.section_name()) {
                self.load_entities(&s, ns);
            }
            if let Some(s) = self.section(&overrides, DimensionKind::GroupLimit.section_name()) {
                self.load_groups(&s, ns);
            }
            if let Some(s) = self.section(&overrides, DimensionKind::CommandLimit.section_name()) {
                self.load_commands(&s, ns);
            }
        }
    }

    /// Read every tier of one dimension key, tracking the running maximum
    fn load_tiers<T: AsTier>(
        &mut self,
        section: &ConfigSection<'_>,
        dimension: &Dimension,
        namespace: Option<&str>,
        read: fn(&ConfigSection<'_>, &str) -> Result<T, ConfigError>,
    ) -> TierTable<T> {
        let mut table = TierTable::new();
        for id in section.keys() {
            if matches!(dimension, Dimension::CommandLimit(_)) && id == "name" {
                continue;
            }
            match section.child(id).and_then(|tier_section| read(&tier_section, id)) {
                Ok(tier) => {
                    self.index.record_max_level(dimension, namespace, tier.tier().max_level);
                    table.insert(tier);
                }
                Err(err) => self.report(err),
            }
        }
        table
    }

    fn load_range(&mut self, section: &ConfigSection<'_>, namespace: Option<&str>) {
        let table = self.load_tiers(section, &Dimension::Range, namespace, read_tier);
        *self.index.range.scope_mut(namespace) = table;
    }

    fn load_blocks(&mut self, section: &ConfigSection<'_>, namespace: Option<&str>) {
        for name in section.keys() {
            let Some(material) = self.catalog.block(name) else {
                self.report(ConfigError::InvalidKey {
                    path: section.child_path(name),
                    reason: format!("Material {} is not a valid material", name),
                });
                continue;
            };
            let Some(tiers) = self.section(section, name) else {
                continue;
            };
            let table = self.load_tiers(&tiers, &Dimension::BlockLimit(material.clone()), namespace, read_tier);
            self.index.blocks.scope_mut(namespace).insert(material, table);
        }
    }

    fn load_entities(&mut self, section: &ConfigSection<'_>, namespace: Option<&str>) {
        for name in section.keys() {
            let entity = match self.catalog.entity(name) {
                Some(entity) if self.index.entity_icons.contains_key(&entity) => entity,
                Some(_) => {
                    self.report(ConfigError::InvalidKey {
                        path: section.child_path(name),
                        reason: format!("Entity {} is missing a corresponding icon", name),
                    });
                    continue;
                }
                None => {
                    self.report(ConfigError::InvalidKey {
                        path: section.child_path(name),
                        reason: format!("Entity {} is not a valid entity", name),
                    });
                    continue;
                }
            };
            let Some(tiers) = self.section(section, name) else {
                continue;
            };
            let table = self.load_tiers(&tiers, &Dimension::EntityLimit(entity.clone()), namespace, read_tier);
            self.index.entities.scope_mut(namespace).insert(entity, table);
        }
    }

    fn load_groups(&mut self, section: &ConfigSection<'_>, namespace: Option<&str>) {
        for group in section.keys() {
            let Some(tiers) = self.section(section, group) else {
                continue;
            };
            let table = self.load_tiers(&tiers, &Dimension::GroupLimit(group.to_string()), namespace, read_tier);
            self.index.groups.scope_mut(namespace).insert(group.to_string(), table);
        }
    }

    fn load_commands(&mut self, section: &ConfigSection<'_>, namespace: Option<&str>) {
        for command in section.keys() {
            if !self.index.command_icons.contains_key(command) {
                self.report(ConfigError::InvalidKey {
                    path: section.child_path(command),
                    reason: format!("Command {} is missing a corresponding icon", command),
                });
                continue;
            }
            let Some(tiers) = self.section(section, command) else {
                continue;
            };

            let name = tiers.get_string("name").unwrap_or_else(|| command.to_string());
            if name != command || !self.index.command_names.contains_key(command) {
                self.index.command_names.insert(command.to_string(), name);
            }

            let dimension = Dimension::CommandLimit(command.to_string());
            let table = self.load_tiers(&tiers, &dimension, namespace, read_command_tier);
            self.index.commands.scope_mut(namespace).insert(command.to_string(), table);
        }
    }

    fn load_entity_icons(&mut self, section: &ConfigSection<'_>) {
        for name in section.keys() {
            let material_name = section.get_string(name).unwrap_or_default();
            match (self.catalog.entity(name), self.catalog.material(&material_name)) {
                (None, _) => self.report(ConfigError::InvalidKey {
                    path: section.child_path(name),
                    reason: format!("EntityType {} is not valid in icon", name),
                }),
                (_, None) => self.report(ConfigError::InvalidKey {
                    path: section.child_path(name),
                    reason: format!("Material {} is not a valid material", material_name),
                }),
                (Some(entity), Some(material)) => {
                    self.index.entity_icons.insert(entity, material);
                }
            }
        }
    }

    fn load_icons(&mut self, section: &ConfigSection<'_>) -> BTreeMap<String, Material> {
        let mut icons = BTreeMap::new();
        for key in section.keys() {
            let material_name = section.get_string(key).unwrap_or_default();
            match self.catalog.material(&material_name) {
                Some(material) => {
                    icons.insert(key.to_string(), material);
                }
                None => self.report(ConfigError::InvalidKey {
                    path: section.child_path(key),
                    reason: format!("Material {} is not a valid material", material_name),
                }),
            }
        }
        icons
    }
}

/// Build an index from `root`, logging and dropping bad entries
pub fn build_index(root: &ConfigSection<'_>, catalog: &dyn Catalog) -> (DimensionIndex, Vec<ConfigError>) {
    IndexBuilder::new(catalog).build(root)
}

/// Parse an optional formula field
fn formula(section: &ConfigSection<'_>, field: &str) -> Result<Option<Expression>, ConfigError> {
    let Some(text) = section.get_string(field) else {
        if section.is_set(field) {
            return Err(section.invalid(field, "a formula"));
        }
        return Ok(None);
    };
    let expression = parse(&text).map_err(|source| ConfigError::InvalidFormula {
        tier: section.path().to_string(),
        field: field.to_string(),
        source,
    })?;
    for var in expression.variables() {
        if !STANDARD_VARS.contains(&var) {
            log::warn!("Config: {}: '{}' uses unknown variable {}", section.path(), field, var);
        }
    }
    Ok(Some(expression))
}

/// Fields shared by every tier. `effect` is the already-read effect formula.
fn read_common(section: &ConfigSection<'_>, id: &str, effect: Expression) -> Result<Tier, ConfigError> {
    let max_level = match section.get_i64("max-level")? {
        Some(level) if level >= UNBOUNDED => level,
        Some(_) => return Err(section.invalid("max-level", "-1 (no ceiling) or a level of 0 or more")),
        None => {
            log::warn!("Config: {}: no 'max-level', tier has no ceiling", section.path());
            UNBOUNDED
        }
    };
    let permission_level = match section.get_i64("permission-level")? {
        Some(level) => i32::try_from(level).map_err(|_| section.invalid("permission-level", "a 32-bit integer"))?,
        None => 0,
    };
    Ok(Tier {
        id: id.to_string(),
        tier_name: id.to_string(),
        max_level,
        permission_level,
        effect,
        min_secondary_level: formula(section, "island-min-level")?.unwrap_or_else(Expression::zero),
        cost: formula(section, "vault-cost")?.unwrap_or_else(Expression::zero),
    })
}

fn read_tier(section: &ConfigSection<'_>, id: &str) -> Result<Tier, ConfigError> {
    let effect = formula(section, "upgrade")?.ok_or_else(|| ConfigError::MissingField {
        tier: section.path().to_string(),
        field: "upgrade".to_string(),
    })?;
    read_common(section, id, effect)
}

fn read_command_tier(section: &ConfigSection<'_>, id: &str) -> Result<CommandTier, ConfigError> {
    Ok(CommandTier {
        tier: read_common(section, id, Expression::zero())?,
        commands: section.get_string_list("command"),
        run_as_console: section.get_bool("console").unwrap_or(false),
    })
}
