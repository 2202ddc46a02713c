//! Options controlling how connections are resolved.
use crate::namespace::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid options: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("'{0}' cannot be used as a namespace delimiter")]
    InvalidDelimiter(char),
}

/// How the compatibility checker reports failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Stop at the first incompatible connection, in target order.
    #[default]
    FailFast,
    /// Check every connection and report all incompatibilities together.
    Collect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveOptions {
    /// Separator between system names in absolute paths.
    pub delimiter: char,
    pub error_mode: ErrorMode,
    /// Run per-connection checks and owner assignment on the rayon pool.
    pub parallel: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            error_mode: ErrorMode::FailFast,
            parallel: false,
        }
    }
}

impl ResolveOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = self.delimiter;
        if d.is_alphanumeric() || d.is_whitespace() || d == '_' {
            return Err(ConfigError::InvalidDelimiter(d));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
