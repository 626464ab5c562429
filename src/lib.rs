//! Upgrades - formula-driven upgrade tiers for island game modes
//!
//! Server operators describe each upgrade as level tiers whose effect, island
//! level gate and cost are small formulas. This crate parses those formulas,
//! builds tier tables from configuration (with per-game-mode overrides) and
//! answers "what does the next level cost and do" queries.

pub mod config;
pub mod formula;
pub mod resolver;
pub mod save;
pub mod tiers;
pub mod upgrade;

// Re-export commonly used types
pub use config::{Catalog, ConfigError, UpgradeConfig, VanillaCatalog};
pub use formula::{parse, EvalError, Expression, ParseError, VariableBinding};
pub use resolver::UpgradeService;
pub use tiers::{CommandTier, Dimension, DimensionIndex, DimensionKind, Quote, Tier, TierTable};
pub use upgrade::{apply_upgrade, can_upgrade, format_command, is_visible, UpgradeOffer};
