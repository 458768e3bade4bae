// Configuration loading

pub mod settings;

pub use settings::{HttpSettings, Settings, SourceConfig, SourceKind};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file exists but can't be read.
    Io(String),
    /// TOML syntax / deserialization error.
    Parse(String),
    /// Parsed fine but inconsistent (missing sheet, zero timeout, ...).
    Validation(String),
    /// `--source NAME` with no matching `[sources.NAME]`.
    UnknownSource(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config IO error: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownSource(name) => write!(f, "no source named '{name}' in config"),
        }
    }
}

impl std::error::Error for ConfigError {}
