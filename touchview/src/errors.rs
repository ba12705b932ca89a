//! Error types for the touchview application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for the expected layout.
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors parsing a `--touch` argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TouchArgError {
    #[error("expected 6 comma-separated fields (id,x,y,dx,dy,move), got {0}")]
    FieldCount(usize),

    #[error("invalid {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },
}
