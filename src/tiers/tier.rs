//! Upgrade tiers
//!
//! A tier is one level bracket of a dimension: it applies while the current
//! level is at or below its `max_level`, and carries three formulas for the
//! effect, the island level gate and the cost of the next step.

use serde::{Deserialize, Serialize};

use crate::formula::{EvalError, Expression, VariableBinding};

/// `max_level` marker for a tier with no ceiling
pub const UNBOUNDED: i64 = -1;

/// One level bracket with its formulas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Config key of the tier
    pub id: String,
    /// Display name of the tier
    pub tier_name: String,
    /// Highest current level this tier applies to, or [`UNBOUNDED`]
    pub max_level: i64,
    /// Permission level needed to see the upgrade (0 = none)
    pub permission_level: i32,
    /// Effect magnitude (range growth, limit increase)
    pub effect: Expression,
    /// Minimum island level required to buy the upgrade
    pub min_secondary_level: Expression,
    /// Money cost of the upgrade
    pub cost: Expression,
}

/// A tier whose upgrade runs configured commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTier {
    pub tier: Tier,
    /// Command templates; see [`format_command`](crate::upgrade::format_command)
    pub commands: Vec<String>,
    /// Dispatch from the server console instead of the player
    pub run_as_console: bool,
}

/// Access to the shared tier data of a tier variant
pub trait AsTier {
    fn tier(&self) -> &Tier;
}

impl AsTier for Tier {
    fn tier(&self) -> &Tier {
        self
    }
}

impl AsTier for CommandTier {
    fn tier(&self) -> &Tier {
        &self.tier
    }
}

/// Raw formula results for one tier and one set of inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub min_secondary_level: f64,
    pub cost: f64,
    pub effect: f64,
}

/// Integer view of a [`Quote`], truncated toward zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeValues {
    pub island_level: i64,
    pub cost: i64,
    pub effect: i64,
}

impl Quote {
    /// Truncate each value toward zero (NaN becomes 0, infinities saturate)
    pub fn truncated(&self) -> UpgradeValues {
        UpgradeValues {
            island_level: self.min_secondary_level as i64,
            cost: self.cost as i64,
            effect: self.effect as i64,
        }
    }
}

impl Tier {
    pub fn new(id: &str, max_level: i64) -> Self {
        Self {
            id: id.to_string(),
            tier_name: id.to_string(),
            max_level,
            permission_level: 0,
            effect: Expression::zero(),
            min_secondary_level: Expression::zero(),
            cost: Expression::zero(),
        }
    }

    /// Only the [`UNBOUNDED`] sentinel counts; other negative ceilings cover nothing
    pub fn is_unbounded(&self) -> bool {
        self.max_level == UNBOUNDED
    }

    /// Whether this tier applies to `level`. Unbounded tiers cover every level.
    pub fn covers(&self, level: i64) -> bool {
        self.is_unbounded() || level <= self.max_level
    }

    pub fn calculate_effect(&self, level: i64, island_level: i64, players: i64) -> Result<f64, EvalError> {
        self.effect.eval(&bind(level, island_level, players))
    }

    pub fn calculate_min_island_level(&self, level: i64, island_level: i64, players: i64) -> Result<f64, EvalError> {
        self.min_secondary_level.eval(&bind(level, island_level, players))
    }

    pub fn calculate_cost(&self, level: i64, island_level: i64, players: i64) -> Result<f64, EvalError> {
        self.cost.eval(&bind(level, island_level, players))
    }

    /// Evaluate all three formulas against one binding
    pub fn quote(&self, level: i64, island_level: i64, players: i64) -> Result<Quote, EvalError> {
        let vars = bind(level, island_level, players);
        Ok(Quote {
            min_secondary_level: self.min_secondary_level.eval(&vars)?,
            cost: self.cost.eval(&vars)?,
            effect: self.effect.eval(&vars)?,
        })
    }
}

fn bind(level: i64, island_level: i64, players: i64) -> VariableBinding {
    VariableBinding::new(level as f64, island_level as f64, players as f64)
}
