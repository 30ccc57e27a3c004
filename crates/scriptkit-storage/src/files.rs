//! File access relative to a storage root.

use crate::{Image, StorageError, StorageResult};
use scriptkit_config_and_utils::Paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File manager bound to one root directory.
///
/// Cloud roots behave like local ones except that [`FileManager::download_from_cloud`]
/// verifies the file has been materialized by the sync provider.
#[derive(Debug, Clone)]
pub struct FileManager {
    root: PathBuf,
    cloud: bool,
}

impl FileManager {
    /// Manager for a plain local directory.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cloud: false,
        }
    }

    /// Manager for a directory kept in sync by a cloud file provider.
    pub fn cloud(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cloud: true,
        }
    }

    /// Manager for the durable root.
    pub fn durable(paths: &Paths) -> Self {
        Self::local(paths.durable_dir())
    }

    /// Manager for the temporary root.
    pub fn temporary(paths: &Paths) -> Self {
        Self::local(paths.temporary_dir())
    }

    /// Manager for the cloud root, if one is configured.
    pub fn cloud_from(paths: &Paths) -> Option<Self> {
        paths.cloud_dir().map(Self::cloud)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_cloud(&self) -> bool {
        self.cloud
    }

    /// Path of `name` under the root.
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Create `path` and any missing parents.
    pub fn create_directory(&self, path: &Path) -> StorageResult<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    pub fn read_string(&self, path: &Path) -> StorageResult<String> {
        Ok(fs::read_to_string(path)?)
    }

    pub fn write_string(&self, path: &Path, content: &str) -> StorageResult<()> {
        self.write_bytes(path, content.as_bytes())
    }

    pub fn read_bytes(&self, path: &Path) -> StorageResult<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    /// Write `bytes` to `path`, creating parent directories.
    pub fn write_bytes(&self, path: &Path, bytes: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn read_image(&self, path: &Path) -> StorageResult<Image> {
        Image::from_bytes(&self.read_bytes(path)?)
    }

    /// Write `image` to `path` as PNG.
    pub fn write_image(&self, path: &Path, image: &Image) -> StorageResult<()> {
        self.write_bytes(path, &image.to_png()?)
    }

    /// Delete the file at `path`, returning whether it existed.
    pub fn remove(&self, path: &Path) -> StorageResult<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Make sure a cloud file is available locally before it is read.
    ///
    /// Local roots return immediately. For cloud roots, a file that exists only
    /// as a `.<name>.icloud` placeholder is reported as
    /// [`StorageError::NotDownloaded`]; the provider fetches it on its own schedule.
    pub fn download_from_cloud(&self, path: &Path) -> StorageResult<()> {
        if !self.cloud || path.exists() {
            return Ok(());
        }

        if let Some(placeholder) = cloud_placeholder(path) {
            if placeholder.exists() {
                debug!(path = %path.display(), "cloud file not materialized yet");
                return Err(StorageError::NotDownloaded(path.to_path_buf()));
            }
        }
        Ok(())
    }
}

/// `dir/.name.icloud` for `dir/name`.
fn cloud_placeholder(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    Some(path.with_file_name(format!(".{}.icloud", name)))
}
