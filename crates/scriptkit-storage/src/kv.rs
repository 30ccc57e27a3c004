//! Hashed-key value store over the file system and the secure store.

use crate::{FileManager, SecureStorage, StorageResult, StoredValue};
use scriptkit_config_and_utils::{hash, Paths};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Backing directory selected by a [`KeyValueStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Long-lived documents directory.
    Durable,
    /// Cache-lifetime directory.
    Temporary,
}

impl StorageScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Temporary => "temporary",
        }
    }
}

/// Key-value store for one scope.
///
/// Every logical key is hashed with [`hash`] before it touches disk or the
/// secure store. Binary and image values are written as files under the scope
/// root; every value, whatever its shape, is also written to the secure store
/// as JSON.
///
/// Reads and removals look for files under the *durable* root regardless of
/// the store's scope, then fall back to the secure store. A file-backed value
/// written through a temporary store is therefore only visible through its
/// secure-store entry.
///
/// There is no locking, expiry, or size bound: the last writer wins.
#[derive(Clone)]
pub struct KeyValueStore {
    scope: StorageScope,
    files: FileManager,
    durable: FileManager,
    secure: Arc<dyn SecureStorage>,
}

impl KeyValueStore {
    /// Store for `scope`. `secure` should already be scoped to the script and scope
    /// (see [`crate::service_name`]).
    pub fn new(scope: StorageScope, paths: &Paths, secure: Arc<dyn SecureStorage>) -> Self {
        let files = match scope {
            StorageScope::Durable => FileManager::durable(paths),
            StorageScope::Temporary => FileManager::temporary(paths),
        };
        Self {
            scope,
            files,
            durable: FileManager::durable(paths),
            secure,
        }
    }

    /// Durable store (`setStorage`/`getStorage`/`removeStorage`).
    pub fn storage(paths: &Paths, secure: Arc<dyn SecureStorage>) -> Self {
        Self::new(StorageScope::Durable, paths, secure)
    }

    /// Temporary store (`setCache`/`getCache`/`removeCache`).
    pub fn cache(paths: &Paths, secure: Arc<dyn SecureStorage>) -> Self {
        Self::new(StorageScope::Temporary, paths, secure)
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }

    /// Write `value` under `key`.
    pub fn set(&self, key: &str, value: &StoredValue) -> StorageResult<()> {
        let storage_key = hash(key);
        debug!(scope = self.scope.as_str(), key, %storage_key, "storing value");

        match value {
            StoredValue::Image(image) => {
                self.files.write_image(&self.files.join(&storage_key), image)?;
            }
            StoredValue::Binary(bytes) => {
                self.files.write_bytes(&self.files.join(&storage_key), bytes)?;
            }
            StoredValue::Json(_) => {}
        }

        let json = serde_json::to_string(&value.to_json())?;
        self.secure.set(&storage_key, &json)
    }

    /// Serialize `value` and store it as JSON.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        self.set(key, &StoredValue::Json(serde_json::to_value(value)?))
    }

    /// Read the value under `key`: durable file first (image, then raw bytes),
    /// then the secure store. `None` when neither has it.
    pub fn get(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        let storage_key = hash(key);
        let path = self.durable.join(&storage_key);

        if self.durable.file_exists(&path) {
            let bytes = self.durable.read_bytes(&path)?;
            let value = match crate::Image::from_bytes(&bytes) {
                Ok(image) => StoredValue::Image(image),
                Err(_) => StoredValue::Binary(bytes),
            };
            debug!(scope = self.scope.as_str(), key, "found file entry");
            return Ok(Some(value));
        }

        match self.secure.get(&storage_key)? {
            Some(raw) => Ok(Some(StoredValue::Json(serde_json::from_str(&raw)?))),
            None => Ok(None),
        }
    }

    /// Read the value under `key` and deserialize it from JSON.
    ///
    /// File-backed values are not JSON and yield `Ok(None)`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key)? {
            Some(StoredValue::Json(value)) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }

    /// Remove the durable file and the secure-store entry for `key`.
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        let storage_key = hash(key);
        debug!(scope = self.scope.as_str(), key, "removing value");

        self.durable.remove(&self.durable.join(&storage_key))?;
        self.secure.delete(&storage_key)?;
        Ok(())
    }
}
