//! Storage helpers for scriptkit.
//!
//! - [`SecureStorage`]: per-script string secrets, backed by the platform keychain
//!   - **macOS**: Keychain Access via `security-framework`
//!   - **Linux**: Secret Service (GNOME Keyring / KWallet) via `secret-service`
//!   - **Windows**: Credential Vault via `windows` crate
//! - [`FileManager`]: file access relative to one storage root
//! - [`KeyValueStore`]: hashed-key set/get/remove over both of the above
//! - [`Image`]: decoded raster images stored as PNG files

mod files;
mod kv;
mod memory;
mod raster;
mod traits;
mod value;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

pub use files::FileManager;
pub use kv::{KeyValueStore, StorageScope};
pub use memory::MemoryStorage;
pub use raster::{Image, PLACEHOLDER_SIZE};
pub use traits::SecureStorage;
pub use value::StoredValue;

use std::path::PathBuf;
use thiserror::Error;

/// Prefix for every secure-store service name.
pub const SERVICE_PREFIX: &str = "scriptkit";

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Platform-specific storage error
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// Key or file not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Cloud file exists only as a remote placeholder
    #[error("File is not downloaded from the cloud: {0}")]
    NotDownloaded(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Secure-store service name for a script and scope: `scriptkit.<script>.<scope>`.
pub fn service_name(script_name: &str, scope: StorageScope) -> String {
    format!("{}.{}.{}", SERVICE_PREFIX, script_name, scope.as_str())
}

/// Create the default platform-specific storage implementation.
pub fn create_storage(service_name: &str) -> StorageResult<Box<dyn SecureStorage>> {
    #[cfg(target_os = "macos")]
    {
        let storage = macos::KeychainStorage::new(service_name)?;
        Ok(Box::new(storage))
    }

    #[cfg(target_os = "linux")]
    {
        let storage = linux::SecretServiceStorage::new(service_name)?;
        Ok(Box::new(storage))
    }

    #[cfg(target_os = "windows")]
    {
        let storage = windows::CredentialStorage::new(service_name)?;
        Ok(Box::new(storage))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Err(StorageError::Platform(format!(
            "No secure storage implementation available for {}",
            service_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_is_scoped() {
        assert_eq!(
            service_name("weather", StorageScope::Durable),
            "scriptkit.weather.durable"
        );
        assert_eq!(
            service_name("weather", StorageScope::Temporary),
            "scriptkit.weather.temporary"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = StorageError::NotDownloaded(PathBuf::from("/cloud/a.json"));
        assert_eq!(
            err.to_string(),
            "File is not downloaded from the cloud: /cloud/a.json"
        );
        assert_eq!(
            StorageError::Platform("locked".into()).to_string(),
            "Platform storage error: locked"
        );
    }
}
