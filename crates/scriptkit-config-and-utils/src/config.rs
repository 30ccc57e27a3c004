//! Configuration management.

use crate::{CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default HTTP request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

/// Environment variable overriding the log level.
const LOG_LEVEL_ENV: &str = "SCRIPTKIT_LOG_LEVEL";

/// User configuration stored in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Timeout applied to requests that do not specify one.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Name of the running script; scopes the secure store and settings file.
    #[serde(default)]
    pub script_name: Option<String>,
    /// Cloud-synced directory used for settings when `cloud_settings` is on.
    #[serde(default)]
    pub cloud_dir: Option<PathBuf>,
    /// Keep settings documents in the cloud directory.
    #[serde(default)]
    pub cloud_settings: bool,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            script_name: None,
            cloud_dir: None,
            cloud_settings: false,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from `paths.config_file()`, falling back to defaults.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to `paths.config_file()`.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var(LOG_LEVEL_ENV) {
            if !log_level.trim().is_empty() {
                self.log_level = log_level.trim().to_string();
            }
        }
    }

    /// Cloud root to use for settings, if enabled and configured.
    pub fn settings_cloud_dir(&self) -> Option<&Path> {
        if self.cloud_settings {
            self.cloud_dir.as_deref()
        } else {
            None
        }
    }
}
