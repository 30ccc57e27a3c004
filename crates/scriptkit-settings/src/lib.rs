//! Per-script settings documents.
//!
//! Each script owns one JSON object persisted at `<root>/settings/<name>.json`.
//! Every write is a whole-document read-modify-write with no locking, so
//! concurrent writers lose updates (last write wins).

mod settings;

pub use settings::{resolve_settings_name, ScriptContext, SettingsStore, SETTINGS_DIR};

use thiserror::Error;

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Underlying file or cloud-sync failure
    #[error("Storage error: {0}")]
    Storage(#[from] scriptkit_storage::StorageError),

    /// Document or value could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings file holds something other than a JSON object
    #[error("Settings document {0} is not a JSON object")]
    NotAnObject(String),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
