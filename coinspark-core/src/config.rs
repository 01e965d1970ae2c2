//! Runtime configuration.
//!
//! A small TOML table controlling the cache TTL, the default sparkline grid,
//! and the HTTP timeout. Every field has a default, so a partial file (or no
//! file at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration for the chart service and its HTTP backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Seconds an acquired series stays live in the cache.
    pub cache_ttl_secs: u64,
    /// Default sparkline grid width (columns).
    pub width: usize,
    /// Default sparkline grid height (rows).
    pub height: usize,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 120,
            width: 60,
            height: 10,
            request_timeout_secs: 10,
        }
    }
}

impl ChartConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_toml(&text)
    }
}

/// Errors from config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
