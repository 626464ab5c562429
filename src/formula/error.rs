//! Formula error types

use thiserror::Error;

/// Failure to compile formula text into an [`Expression`](super::Expression)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A character that cannot start a factor, or trailing input after a complete formula
    #[error("Unexpected '{found}' at position {position}")]
    Unexpected { found: char, position: usize },
    /// Input ended where a factor was expected
    #[error("Unexpected end of formula at position {position}")]
    UnexpectedEnd { position: usize },
    /// An opening parenthesis was never closed
    #[error("Missing ')' for '(' opened at position {opened_at}")]
    UnclosedParen { opened_at: usize },
    /// Digits with more than one decimal point, or a lone '.'
    #[error("Malformed number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },
    /// Nesting past [`MAX_DEPTH`](super::parser::MAX_DEPTH)
    #[error("Formula nested too deeply at position {position}")]
    TooDeep { position: usize },
}

impl ParseError {
    /// Byte offset in the formula text where parsing failed
    pub fn position(&self) -> usize {
        match self {
            ParseError::Unexpected { position, .. }
            | ParseError::UnexpectedEnd { position }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::TooDeep { position } => *position,
            ParseError::UnclosedParen { opened_at } => *opened_at,
        }
    }
}

/// Failure while evaluating a parsed formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),
}
