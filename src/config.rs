use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::demo::{DEFAULT_OVERFLOW_LIMIT, DEFAULT_UPPER_BOUND};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Settings for the overflow demo. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Last value the producer tries to yield.
    pub upper_bound: u64,
    /// Largest value allowed through before the producer fails.
    pub overflow_limit: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            upper_bound: DEFAULT_UPPER_BOUND,
            overflow_limit: DEFAULT_OVERFLOW_LIMIT,
        }
    }
}

impl DemoConfig {
    pub fn from_toml(path: &str, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        Self::from_toml(&shown, &text)
    }
}
