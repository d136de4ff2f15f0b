//! Client configuration
//!
//! Values are resolved in priority order:
//!
//! 1. Environment variables (`BUDGETIT_API_URL`, `BUDGETIT_DATA_DIR`,
//!    `BUDGETIT_NOTIFICATION_SECS`)
//! 2. `~/.local/share/budgetit/config.toml` (or the file passed to
//!    [`Config::load_from`])
//! 3. Built-in defaults
//!
//! ```toml
//! api_url = "http://localhost:5000/api"
//! notification_secs = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

pub const API_URL_ENV: &str = "BUDGETIT_API_URL";
pub const DATA_DIR_ENV: &str = "BUDGETIT_DATA_DIR";
pub const NOTIFICATION_SECS_ENV: &str = "BUDGETIT_NOTIFICATION_SECS";

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the BudgetIt backend (no trailing slash)
    pub api_url: String,
    /// Where the session file lives
    pub data_dir: PathBuf,
    /// How long a notification stays on screen
    pub notification_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            notification_duration: crate::insights::DEFAULT_DISPLAY_DURATION,
        }
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
    notification_secs: Option<u64>,
}

impl Config {
    /// Load from the default config file location plus environment
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::from_raw(RawConfig::default()).with_env(),
        }
    }

    /// Load from a specific config file (missing file = defaults) plus environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
            parse_config(&content)?
        } else {
            RawConfig::default()
        };

        Self::from_raw(raw).with_env()
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Config::default();
        if let Some(url) = raw.api_url {
            config.api_url = normalize_url(&url);
        }
        if let Some(dir) = raw.data_dir {
            config.data_dir = dir;
        }
        if let Some(secs) = raw.notification_secs {
            config.notification_duration = Duration::from_secs(secs);
        }
        config
    }

    /// Apply environment overrides
    fn with_env(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.api_url = normalize_url(&url);
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(secs) = std::env::var(NOTIFICATION_SECS_ENV) {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds", NOTIFICATION_SECS_ENV))
            })?;
            self.notification_duration = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Override the API URL (e.g. from a CLI flag)
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_url(url);
        self
    }

    /// Path of the persisted session file
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

/// Default data directory (~/.local/share/budgetit on Linux)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("budgetit"))
        .unwrap_or_else(|| PathBuf::from(".budgetit"))
}

/// Default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("budgetit").join("config.toml"))
}

fn parse_config(content: &str) -> Result<RawConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
