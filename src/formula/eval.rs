//! Formula evaluation
//!
//! Evaluation is a pure function of the expression tree and a variable
//! binding. Float semantics are kept as-is: `10/0` is `+inf`, not an error.

use std::collections::BTreeMap;

use super::ast::Expression;
use super::error::EvalError;

/// Source name of the current upgrade level variable
pub const LEVEL_VAR: &str = "[level]";
/// Source name of the island (secondary) level variable
pub const ISLAND_LEVEL_VAR: &str = "[islandLevel]";
/// Source name of the island member count variable
pub const NUMBER_PLAYER_VAR: &str = "[numberPlayer]";

/// The variables every tier formula may reference
pub const STANDARD_VARS: [&str; 3] = [LEVEL_VAR, ISLAND_LEVEL_VAR, NUMBER_PLAYER_VAR];

/// Variable name to value mapping, built fresh for each query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBinding {
    values: BTreeMap<String, f64>,
}

impl VariableBinding {
    /// Binding with the three standard tier variables
    pub fn new(level: f64, island_level: f64, number_player: f64) -> Self {
        Self::empty()
            .with(LEVEL_VAR, level)
            .with(ISLAND_LEVEL_VAR, island_level)
            .with(NUMBER_PLAYER_VAR, number_player)
    }

    /// Binding with no variables at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

impl Expression {
    /// Evaluate against `vars`. Referencing a name absent from the binding fails.
    pub fn eval(&self, vars: &VariableBinding) -> Result<f64, EvalError> {
        match self {
            Expression::Constant(value) => Ok(*value),
            Expression::Variable(name) => vars
                .get(name)
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expression::UnaryMinus(inner) => Ok(-inner.eval(vars)?),
            Expression::BinaryOp(op, left, right) => {
                Ok(op.apply(left.eval(vars)?, right.eval(vars)?))
            }
            Expression::Call(func, arg) => Ok(func.apply(arg.eval(vars)?)),
        }
    }
}
