use crate::{SettingsError, SettingsResult};
use scriptkit_config_and_utils::hash;
use scriptkit_storage::FileManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory under the storage root holding settings documents.
pub const SETTINGS_DIR: &str = "settings";

/// Identity of the running script, used to name its settings document.
#[derive(Debug, Clone, Default)]
pub struct ScriptContext {
    /// Script file path, e.g. `/scripts/weather.js`.
    pub script_path: Option<PathBuf>,
}

impl ScriptContext {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: Some(path.into()),
        }
    }
}

/// Settings file stem: explicit name, else the script's file name without
/// extension, else `hash("settings:<script path>")`.
pub fn resolve_settings_name(name: Option<&str>, context: &ScriptContext) -> String {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let path = context.script_path.as_deref();
    if let Some(stem) = path.and_then(Path::file_stem).and_then(|s| s.to_str()) {
        if !stem.is_empty() {
            return stem.to_string();
        }
    }

    let path_text = path.map(|p| p.display().to_string()).unwrap_or_default();
    hash(&format!("settings:{}", path_text))
}

/// One script's settings document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    files: FileManager,
    file: PathBuf,
}

impl SettingsStore {
    /// Store for `name` (see [`resolve_settings_name`]) under the root of `files`.
    /// Pass a cloud [`FileManager`] to keep the document in a synced directory.
    pub fn new(files: FileManager, name: Option<&str>, context: &ScriptContext) -> Self {
        let stem = resolve_settings_name(name, context);
        let file = files.join(SETTINGS_DIR).join(format!("{}.json", stem));
        Self { files, file }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Ensure the directory and document exist, writing `{}` when absent.
    /// Returns whether the document already existed.
    fn ensure_file(&self) -> SettingsResult<bool> {
        self.files.download_from_cloud(&self.file)?;

        if self.files.file_exists(&self.file) {
            return Ok(true);
        }

        if let Some(dir) = self.file.parent() {
            self.files.create_directory(dir)?;
        }
        self.files.write_string(&self.file, "{}")?;
        debug!(path = %self.file.display(), "created settings document");
        Ok(false)
    }

    fn read_document(&self) -> SettingsResult<Map<String, Value>> {
        let raw = self.files.read_string(&self.file)?;
        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(SettingsError::NotAnObject(self.file.display().to_string())),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> SettingsResult<()> {
        self.files.download_from_cloud(&self.file)?;
        self.files
            .write_string(&self.file, &serde_json::to_string(document)?)?;
        Ok(())
    }

    /// Value stored at `key`.
    ///
    /// `None` when the document did not exist before this call (it is created
    /// empty) or when `key` is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> SettingsResult<Option<T>> {
        if !self.ensure_file()? {
            return Ok(None);
        }

        match self.read_document()?.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Store `value` at `key`.
    ///
    /// On a new document, writes `{key: value}` and returns `None`. Otherwise
    /// merges into the existing document and returns the full updated document.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> SettingsResult<Option<Map<String, Value>>> {
        let value = serde_json::to_value(value)?;

        if !self.ensure_file()? {
            let mut document = Map::new();
            document.insert(key.to_string(), value);
            self.write_document(&document)?;
            return Ok(None);
        }

        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.write_document(&document)?;
        Ok(Some(document))
    }
}
