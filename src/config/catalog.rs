//! Known materials and entity types
//!
//! The config builder validates block keys, icon materials and entity keys
//! against a [`Catalog`]. Material names match exactly (upper-case); entity
//! names match case-insensitively.

use crate::tiers::{EntityKind, Material};

pub trait Catalog {
    /// Any block or item material, as used for icons
    fn material(&self, name: &str) -> Option<Material>;

    /// A material that can be placed as a block
    fn block(&self, name: &str) -> Option<Material>;

    fn entity(&self, name: &str) -> Option<EntityKind>;
}

/// Placeable block materials
const BLOCKS: &[&str] = &[
    "ACACIA_LOG", "ACACIA_PLANKS", "ANVIL", "BARREL", "BEACON", "BEEHIVE", "BELL", "BIRCH_LOG",
    "BIRCH_PLANKS", "BLAST_FURNACE", "BOOKSHELF", "BREWING_STAND", "CAMPFIRE", "CHEST", "CLAY",
    "COAL_BLOCK", "COAL_ORE", "COBBLESTONE", "COMPARATOR", "COMPOSTER", "CRAFTING_TABLE",
    "DARK_OAK_LOG", "DIAMOND_BLOCK", "DIAMOND_ORE", "DIRT", "DISPENSER", "DROPPER", "EMERALD_BLOCK",
    "ENCHANTING_TABLE", "END_PORTAL_FRAME", "ENDER_CHEST", "FURNACE", "GLASS", "GLOWSTONE",
    "GOLD_BLOCK", "GRASS_BLOCK", "GRAVEL", "HOPPER", "ICE", "IRON_BLOCK", "IRON_ORE", "JUKEBOX",
    "JUNGLE_LOG", "LAPIS_BLOCK", "LECTERN", "LEVER", "MAGMA_BLOCK", "NETHERRACK", "NOTE_BLOCK",
    "OAK_LOG", "OAK_PLANKS", "OBSIDIAN", "OBSERVER", "PISTON", "PUMPKIN", "REDSTONE_BLOCK",
    "REDSTONE_WIRE", "REPEATER", "SAND", "SHULKER_BOX", "SLIME_BLOCK", "SMOKER", "SPAWNER",
    "SPONGE", "SPRUCE_LOG", "STICKY_PISTON", "STONE", "TNT", "TRAPPED_CHEST", "WATER", "LAVA",
];

/// Materials that exist only as items
const ITEMS: &[&str] = &[
    "ARROW", "BONE", "BOOK", "BREAD", "CARROT", "CHICKEN_SPAWN_EGG", "COW_SPAWN_EGG", "DIAMOND",
    "DIAMOND_PICKAXE", "EGG", "ELYTRA", "EMERALD", "ENDER_PEARL", "FEATHER", "FIREWORK_ROCKET",
    "GOLD_INGOT", "GOLDEN_APPLE", "IRON_INGOT", "LEATHER", "MAP", "NAME_TAG", "PAPER",
    "PIG_SPAWN_EGG", "SHEEP_SPAWN_EGG", "STICK", "STRING", "VILLAGER_SPAWN_EGG", "WHEAT",
    "WHITE_WOOL", "ZOMBIE_SPAWN_EGG",
];

const ENTITIES: &[&str] = &[
    "ARMOR_STAND", "BAT", "BEE", "BLAZE", "CAT", "CHICKEN", "COW", "CREEPER", "DOLPHIN", "DONKEY",
    "ENDERMAN", "FOX", "GOAT", "HORSE", "IRON_GOLEM", "ITEM_FRAME", "LLAMA", "MINECART",
    "MOOSHROOM", "OCELOT", "PANDA", "PARROT", "PIG", "RABBIT", "SHEEP", "SKELETON", "SLIME",
    "SNOW_GOLEM", "SPIDER", "SQUID", "TURTLE", "VILLAGER", "WOLF", "ZOMBIE",
];

/// Built-in catalog of common vanilla materials and entity types
#[derive(Debug, Clone, Copy, Default)]
pub struct VanillaCatalog;

impl Catalog for VanillaCatalog {
    fn material(&self, name: &str) -> Option<Material> {
        if BLOCKS.contains(&name) || ITEMS.contains(&name) {
            Some(Material::new(name))
        } else {
            None
        }
    }

    fn block(&self, name: &str) -> Option<Material> {
        BLOCKS.contains(&name).then(|| Material::new(name))
    }

    fn entity(&self, name: &str) -> Option<EntityKind> {
        ENTITIES
            .iter()
            .find(|e| e.eq_ignore_ascii_case(name))
            .map(|e| EntityKind::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_names_are_exact() {
        let catalog = VanillaCatalog;
        assert_eq!(catalog.block("HOPPER"), Some(Material::new("HOPPER")));
        assert_eq!(catalog.block("hopper"), None);
        assert_eq!(catalog.block("DIAMOND"), None);
        assert_eq!(catalog.material("DIAMOND"), Some(Material::new("DIAMOND")));
        assert_eq!(catalog.material("NOT_A_THING"), None);
    }

    #[test]
    fn test_entities_ignore_case() {
        let catalog = VanillaCatalog;
        assert_eq!(catalog.entity("cow"), Some(EntityKind::new("COW")));
        assert_eq!(catalog.entity("Iron_Golem"), Some(EntityKind::new("IRON_GOLEM")));
        assert_eq!(catalog.entity("DRAGONFLY"), None);
    }
}
