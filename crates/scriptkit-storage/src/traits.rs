//! The secure string store seam.

use crate::StorageResult;

/// String store scoped to one script and scope (see [`crate::service_name`]).
///
/// Keys are already-hashed storage keys; values are JSON text.
pub trait SecureStorage: Send + Sync {
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// `None` when no entry exists.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Remove the entry. Returns whether one existed.
    fn delete(&self, key: &str) -> StorageResult<bool>;

    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
