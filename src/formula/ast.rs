//! Formula syntax tree
//!
//! Parsed formulas are plain trees of tagged nodes. They never hold evaluated
//! values, so one tree is reused for every query.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    /// Apply the operator with IEEE-754 semantics (division by zero yields inf/NaN)
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
            BinaryOp::Mul => left * right,
            BinaryOp::Div => left / right,
            BinaryOp::Pow => left.powf(right),
        }
    }
}

/// Built-in single-argument functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Function {
    Sqrt,
    /// Sine of an angle in degrees
    Sin,
    /// Cosine of an angle in degrees
    Cos,
    /// Tangent of an angle in degrees
    Tan,
}

impl Function {
    /// Look up a function by its formula name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Function::Sqrt),
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sqrt => "sqrt",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
        }
    }

    pub fn apply(&self, arg: f64) -> f64 {
        match self {
            Function::Sqrt => arg.sqrt(),
            Function::Sin => arg.to_radians().sin(),
            Function::Cos => arg.to_radians().cos(),
            Function::Tan => arg.to_radians().tan(),
        }
    }
}

/// A parsed arithmetic formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Constant(f64),
    /// Variable looked up by its exact source name (e.g. `[level]`)
    Variable(String),
    UnaryMinus(Box<Expression>),
    BinaryOp(BinaryOp, Box<Expression>, Box<Expression>),
    Call(Function, Box<Expression>),
}

impl Expression {
    /// The constant formula `0`, used when a config omits an optional formula
    pub fn zero() -> Self {
        Expression::Constant(0.0)
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp(op, Box::new(left), Box::new(right))
    }

    /// Every variable name referenced by this formula, in first-seen order
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Constant(_) => {}
            Expression::Variable(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Expression::UnaryMinus(inner) | Expression::Call(_, inner) => {
                inner.collect_variables(names)
            }
            Expression::BinaryOp(_, left, right) => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
        }
    }

    /// Depth of the tree (a lone constant has depth 1)
    pub fn depth(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Variable(_) => 1,
            Expression::UnaryMinus(inner) | Expression::Call(_, inner) => 1 + inner.depth(),
            Expression::BinaryOp(_, left, right) => 1 + left.depth().max(right.depth()),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::UnaryMinus(inner) => write!(f, "-({})", inner),
            Expression::BinaryOp(op, left, right) => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expression::Call(func, arg) => write!(f, "{}({})", func.name(), arg),
        }
    }
}
