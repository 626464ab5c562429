//! Upgrade tiers and their tables

pub mod dimension;
pub mod index;
pub mod table;
pub mod tier;

pub use dimension::{Dimension, DimensionKind, EntityKind, Material};
pub use index::{DimensionIndex, KeyedTables, Scoped};
pub use table::{TierList, TierTable};
pub use tier::{AsTier, CommandTier, Quote, Tier, UpgradeValues, UNBOUNDED};
