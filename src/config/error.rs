//! Configuration errors

use std::path::PathBuf;

use thiserror::Error;

use crate::formula::ParseError;

/// Failure to read a configuration file, or one bad entry inside it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format for {0} (expected .ron or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("{tier}: missing required field '{field}'")]
    MissingField { tier: String, field: String },
    #[error("{tier}: invalid formula in '{field}': {source}")]
    InvalidFormula {
        tier: String,
        field: String,
        #[source]
        source: ParseError,
    },
    #[error("{tier}: field '{field}' must be {expected}")]
    InvalidField {
        tier: String,
        field: String,
        expected: &'static str,
    },
    #[error("{0} is not a section")]
    NotASection(String),
    #[error("{path}: {reason}. Skipping...")]
    InvalidKey { path: String, reason: String },
}
