//! Image resolution with cache and placeholder fallback.

use crate::{DataType, HttpClient, RequestParams, ResponseBody};
use scriptkit_storage::{FileManager, Image, KeyValueStore, StoredValue};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Storage key for the cached image fetched from `url`.
pub fn image_cache_key(url: &str) -> String {
    format!("image:{url}")
}

/// Where to look for an image.
#[derive(Debug, Clone, Default)]
pub struct ImageParams {
    /// Local file; relative paths resolve against the durable root.
    pub filepath: Option<PathBuf>,
    pub url: Option<String>,
    pub use_cache: bool,
}

impl ImageParams {
    pub fn path(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: Some(filepath.into()),
            ..Self::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}

/// Loads images from disk, the image cache, or the network.
pub struct ImageResolver {
    client: HttpClient,
    cache: KeyValueStore,
    files: FileManager,
}

impl ImageResolver {
    /// `cache` is normally the temporary store, `files` the durable file manager.
    pub fn new(client: HttpClient, cache: KeyValueStore, files: FileManager) -> Self {
        Self {
            client,
            cache,
            files,
        }
    }

    /// Resolve `params` to an image. Never fails: anything that goes wrong
    /// yields [`Image::placeholder`].
    ///
    /// A local `filepath` wins over `url`. With `use_cache`, a cached image is
    /// returned as is; a cached entry that is not an image is removed before
    /// fetching.
    pub async fn get_image(&self, params: ImageParams) -> Image {
        if let Some(filepath) = params.filepath {
            let path = self.files.join(&filepath);
            return match self.files.read_image(&path) {
                Ok(image) => image,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load image file");
                    Image::placeholder()
                }
            };
        }

        let Some(url) = params.url else {
            return Image::placeholder();
        };
        let key = image_cache_key(&url);

        if params.use_cache {
            if let Some(image) = self.cached_image(&key) {
                debug!(%url, "serving cached image");
                return image;
            }
        }

        let outcome = self
            .client
            .request(RequestParams::get(&url).data_type(DataType::Image))
            .await;
        match outcome.into_response().map(|response| response.data) {
            Some(ResponseBody::Image(image)) => {
                if let Err(e) = self.cache.set(&key, &StoredValue::Image(image.clone())) {
                    warn!(%url, error = %e, "failed to cache image");
                }
                image
            }
            _ => {
                warn!(%url, "image unavailable, using placeholder");
                Image::placeholder()
            }
        }
    }

    fn cached_image(&self, key: &str) -> Option<Image> {
        match self.cache.get(key) {
            Ok(Some(StoredValue::Image(image))) => Some(image),
            Ok(Some(_)) => {
                warn!(key, "cached entry is not an image, removing it");
                if let Err(e) = self.cache.remove(key) {
                    warn!(key, error = %e, "failed to remove corrupt cache entry");
                }
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "failed to read image cache");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bytes_response, MockTransport};
    use crate::HttpError;
    use scriptkit_config_and_utils::Paths;
    use scriptkit_storage::{MemoryStorage, PLACEHOLDER_SIZE};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    const URL: &str = "https://example.com/a.png";

    struct Fixture {
        dir: TempDir,
        mock: Arc<MockTransport>,
        cache: KeyValueStore,
        resolver: ImageResolver,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let mock = Arc::new(MockTransport::new());
        let storage = KeyValueStore::storage(&paths, Arc::new(MemoryStorage::new()));
        let cache = KeyValueStore::cache(&paths, Arc::new(MemoryStorage::new()));
        let client = HttpClient::new(mock.clone(), storage);
        let resolver = ImageResolver::new(client, cache.clone(), FileManager::durable(&paths));
        Fixture {
            dir,
            mock,
            cache,
            resolver,
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        Image::solid(width, height, [0, 0, 255, 255]).to_png().unwrap()
    }

    fn is_placeholder(image: &Image) -> bool {
        image.size() == (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE) && image.pixel(0, 0) == [255, 0, 0, 255]
    }

    #[test]
    fn test_image_cache_key_format() {
        assert_eq!(image_cache_key(URL), "image:https://example.com/a.png");
    }

    #[tokio::test]
    async fn test_no_params_returns_placeholder() {
        let f = fixture();
        let image = f.resolver.get_image(ImageParams::default()).await;
        assert!(is_placeholder(&image));
        assert_eq!(f.mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_filepath_loads_local_image() {
        let f = fixture();
        let path = f.dir.path().join("local.png");
        std::fs::write(&path, png(7, 5)).unwrap();

        let image = f.resolver.get_image(ImageParams::path(&path)).await;
        assert_eq!(image.size(), (7, 5));
    }

    #[tokio::test]
    async fn test_missing_filepath_returns_placeholder_without_fetching() {
        let f = fixture();
        let params = ImageParams {
            filepath: Some(f.dir.path().join("missing.png")),
            url: Some(URL.into()),
            use_cache: false,
        };
        let image = f.resolver.get_image(params).await;
        assert!(is_placeholder(&image));
        assert_eq!(f.mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_decodes_and_caches() {
        let f = fixture();
        f.mock.push_ok(bytes_response(URL, png(3, 2), "image/png"));

        let image = f.resolver.get_image(ImageParams::url(URL)).await;
        assert_eq!(image.size(), (3, 2));
        assert!(f.cache.get(&image_cache_key(URL)).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_placeholder() {
        let f = fixture();
        f.mock.push_err(HttpError::Timeout);

        let image = f.resolver.get_image(ImageParams::url(URL)).await;
        assert!(is_placeholder(&image));
    }

    #[tokio::test]
    async fn test_undecodable_body_returns_placeholder() {
        let f = fixture();
        f.mock.push_ok(bytes_response(URL, b"not an image".to_vec(), "image/png"));

        let image = f.resolver.get_image(ImageParams::url(URL)).await;
        assert!(is_placeholder(&image));
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_removed_then_fetched() {
        let f = fixture();
        let key = image_cache_key(URL);
        f.cache.set_json(&key, "definitely not an image").unwrap();
        f.mock.push_err(HttpError::Transport("offline".into()));

        let image = f.resolver.get_image(ImageParams::url(URL).use_cache(true)).await;
        assert!(is_placeholder(&image));
        assert_eq!(f.mock.calls(), 1);
        assert!(f.cache.get(&key).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cached_image_skips_network() {
        let f = fixture();
        // File-backed lookups go to the durable root, so seed the durable store.
        let paths = Paths::with_base_dir(f.dir.path().to_path_buf());
        let durable = KeyValueStore::storage(&paths, Arc::new(MemoryStorage::new()));
        durable
            .set(&image_cache_key(URL), &StoredValue::Image(Image::solid(9, 9, [1, 2, 3, 255])))
            .unwrap();

        let image = f.resolver.get_image(ImageParams::url(URL).use_cache(true)).await;
        assert_eq!(image.size(), (9, 9));
        assert_eq!(f.mock.calls(), 0);
    }
}
