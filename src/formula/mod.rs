//! Arithmetic formulas
//!
//! Server operators write upgrade costs and effects as small formulas over
//! `[level]`, `[islandLevel]` and `[numberPlayer]`. Formulas are parsed once
//! at load time and evaluated per query.

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;

pub use ast::{BinaryOp, Expression, Function};
pub use error::{EvalError, ParseError};
pub use eval::{VariableBinding, ISLAND_LEVEL_VAR, LEVEL_VAR, NUMBER_PLAYER_VAR, STANDARD_VARS};
pub use parser::{parse, MAX_DEPTH};
