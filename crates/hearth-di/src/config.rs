//! Provider configuration

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CLOSE_TIMEOUT_ENV: &str = "HEARTH_DI_CLOSE_TIMEOUT_MS";
pub const LOG_RESOLUTIONS_ENV: &str = "HEARTH_DI_LOG_RESOLUTIONS";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Settings applied to a root provider and every scope created from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Upper bound for [`Scope::shutdown`](crate::Scope::shutdown), in
    /// milliseconds
    pub close_timeout_ms: u64,

    /// Log every resolution at debug level instead of trace
    pub log_resolutions: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            close_timeout_ms: 5000,
            log_resolutions: false,
        }
    }
}

impl ProviderConfig {
    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.close_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "close_timeout_ms",
                value: self.close_timeout_ms.to_string(),
            });
        }
        Ok(self)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    /// Loads a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Defaults overridden by `HEARTH_DI_CLOSE_TIMEOUT_MS` and
    /// `HEARTH_DI_LOG_RESOLUTIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ProviderConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(timeout) = lookup(CLOSE_TIMEOUT_ENV) {
            config.close_timeout_ms =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: CLOSE_TIMEOUT_ENV,
                        value: timeout.clone(),
                    })?;
        }

        if let Some(log) = lookup(LOG_RESOLUTIONS_ENV) {
            config.log_resolutions =
                log.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: LOG_RESOLUTIONS_ENV,
                        value: log.clone(),
                    })?;
        }

        config.validate()
    }
}
