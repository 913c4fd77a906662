//! Client configuration.
//!
//! Loaded from `~/.config/bookworm/config.toml` (or the platform
//! equivalent). A missing file means defaults; a malformed file is an
//! error rather than a silent fallback.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::Pacing;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config validation failed: {message}")]
    Validation { message: String },
}

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Bookworm API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Feed page size.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Spinner pacing in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum time the feed refresh spinner stays visible.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Pause before an infinite-scroll fetch.
    #[serde(default = "default_load_more_ms")]
    pub load_more_ms: u64,
    /// Minimum time the profile refresh spinner stays visible.
    #[serde(default = "default_shelf_refresh_ms")]
    pub shelf_refresh_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_page_size() -> u32 {
    2
}

fn default_refresh_ms() -> u64 {
    800
}

fn default_load_more_ms() -> u64 {
    1000
}

fn default_shelf_refresh_ms() -> u64 {
    500
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            load_more_ms: default_load_more_ms(),
            shelf_refresh_ms: default_shelf_refresh_ms(),
        }
    }
}

impl Config {
    /// Path of the configuration file, via `dirs::config_dir()`.
    /// Falls back to the current directory when unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("bookworm").join("config.toml")
    }

    /// Load from the default config file; defaults when it does not
    /// exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks: the base URL is an http(s) URL and the page size is
    /// nonzero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Validation {
                message: format!("api.base_url '{}' is not an http(s) URL", self.api.base_url),
            });
        }
        if self.api.page_size == 0 {
            return Err(ConfigError::Validation {
                message: "api.page_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Pacing policy from the configured millisecond values.
    pub fn pacing(&self) -> Pacing {
        Pacing {
            refresh: Duration::from_millis(self.pacing.refresh_ms),
            load_more: Duration::from_millis(self.pacing.load_more_ms),
            shelf_refresh: Duration::from_millis(self.pacing.shelf_refresh_ms),
        }
    }
}
