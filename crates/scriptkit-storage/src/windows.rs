//! Windows Credential Vault backend.

use crate::{SecureStorage, StorageError, StorageResult};
use tracing::debug;
use windows::{
    core::HSTRING,
    Security::Credentials::{PasswordCredential, PasswordVault},
};

/// `ERROR_NOT_FOUND` as reported by the vault.
const ERROR_NOT_FOUND: u32 = 0x8007_0490;

/// Password Vault credentials under one resource name.
pub struct CredentialStorage {
    resource_name: String,
}

impl CredentialStorage {
    /// Opens the vault once to verify it is accessible.
    pub fn new(service_name: &str) -> StorageResult<Self> {
        Self::vault()?;
        Ok(Self {
            resource_name: service_name.to_string(),
        })
    }

    fn vault() -> StorageResult<PasswordVault> {
        PasswordVault::new().map_err(|e| {
            StorageError::Platform(format!("Failed to access Credential Vault: {}", e))
        })
    }

    fn retrieve(&self, key: &str) -> StorageResult<Option<PasswordCredential>> {
        let vault = Self::vault()?;
        match vault.Retrieve(&HSTRING::from(&self.resource_name), &HSTRING::from(key)) {
            Ok(credential) => Ok(Some(credential)),
            Err(e) if e.code().0 as u32 == ERROR_NOT_FOUND => Ok(None),
            Err(e) => Err(StorageError::Platform(format!(
                "Failed to retrieve credential: {}",
                e
            ))),
        }
    }
}

impl SecureStorage for CredentialStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(resource = %self.resource_name, key = %key, "Setting credential");

        let _ = self.delete(key);

        let credential = PasswordCredential::CreatePasswordCredential(
            &HSTRING::from(&self.resource_name),
            &HSTRING::from(key),
            &HSTRING::from(value),
        )
        .map_err(|e| StorageError::Platform(format!("Failed to create credential: {}", e)))?;

        Self::vault()?
            .Add(&credential)
            .map_err(|e| StorageError::Platform(format!("Failed to add credential: {}", e)))
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        debug!(resource = %self.resource_name, key = %key, "Getting credential");

        let Some(credential) = self.retrieve(key)? else {
            return Ok(None);
        };

        credential
            .RetrievePassword()
            .map_err(|e| StorageError::Platform(format!("Failed to retrieve password: {}", e)))?;
        let password = credential
            .Password()
            .map_err(|e| StorageError::Platform(format!("Failed to get password: {}", e)))?;

        Ok(Some(password.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        debug!(resource = %self.resource_name, key = %key, "Deleting credential");

        let Some(credential) = self.retrieve(key)? else {
            return Ok(false);
        };

        Self::vault()?
            .Remove(&credential)
            .map_err(|e| StorageError::Platform(format!("Failed to remove credential: {}", e)))?;
        Ok(true)
    }
}
