//! File system roots used by the storage helpers.

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Directory name used under the user's cache directory.
const APP_DIR_NAME: &str = "scriptkit";

/// Resolved directory layout.
///
/// - durable root: long-lived documents (`~/.scriptkit/documents`)
/// - temporary root: cache-lifetime files (`<cache dir>/scriptkit`)
/// - cloud root: optional synced directory supplied by configuration
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
    temporary_dir: PathBuf,
    cloud_dir: Option<PathBuf>,
}

impl Paths {
    /// Create a new Paths instance under the user's home and cache directories.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;
        let base_dir = home.join(".scriptkit");

        let temporary_dir = dirs::cache_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| base_dir.join("cache"));

        Ok(Self {
            base_dir,
            temporary_dir,
            cloud_dir: None,
        })
    }

    /// Create a Paths instance with every root nested under `base_dir`.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            temporary_dir: base_dir.join("cache"),
            base_dir,
            cloud_dir: None,
        }
    }

    /// Attach a cloud-synced root.
    pub fn with_cloud_dir(mut self, cloud_dir: Option<PathBuf>) -> Self {
        self.cloud_dir = cloud_dir;
        self
    }

    /// Get the base directory (~/.scriptkit).
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Root for durable storage.
    pub fn durable_dir(&self) -> PathBuf {
        self.base_dir.join("documents")
    }

    /// Root for temporary (cache-lifetime) storage.
    pub fn temporary_dir(&self) -> &Path {
        &self.temporary_dir
    }

    /// Cloud-synced root, if configured.
    pub fn cloud_dir(&self) -> Option<&Path> {
        self.cloud_dir.as_deref()
    }

    /// Get the config file path (~/.scriptkit/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the logs directory (~/.scriptkit/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSON-lines log file (~/.scriptkit/logs/scriptkit.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("scriptkit.jsonl")
    }

    /// Ensure all local directories exist. The cloud root is left alone.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.durable_dir())?;
        std::fs::create_dir_all(&self.temporary_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
