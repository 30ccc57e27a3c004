//! Multipart uploads.

use crate::{
    DataType, FormPart, HttpClient, HttpError, HttpResult, Method, RequestBody, RequestOutcome,
    TransportRequest,
};
use scriptkit_config_and_utils::DEFAULT_REQUEST_TIMEOUT_MS;
use scriptkit_storage::Image;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// What to attach under the upload field.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// File read from disk at send time.
    File(PathBuf),
    /// In-memory image, sent as PNG.
    Image(Image),
}

/// Parameters for [`HttpClient::upload_file`].
#[derive(Debug, Clone)]
pub struct UploadParams {
    pub url: String,
    /// Form field that carries the file.
    pub name: String,
    /// Defaults to the current time in milliseconds.
    pub filename: Option<String>,
    pub source: UploadSource,
    /// Extra text fields, sent before the file part.
    pub fields: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub method: Method,
    pub timeout_ms: u64,
    pub data_type: DataType,
}

impl UploadParams {
    pub fn new(url: impl Into<String>, name: impl Into<String>, source: UploadSource) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            filename: None,
            source,
            fields: BTreeMap::new(),
            headers: BTreeMap::new(),
            method: Method::POST,
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            data_type: DataType::Json,
        }
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    fn into_parts(self) -> HttpResult<Vec<FormPart>> {
        let filename = self
            .filename
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().to_string());

        let (bytes, mime_type) = match self.source {
            UploadSource::File(path) => {
                let bytes = std::fs::read(&path).map_err(|e| {
                    HttpError::InvalidRequest(format!("cannot read {}: {e}", path.display()))
                })?;
                (bytes, mime_for_path(&path))
            }
            UploadSource::Image(image) => {
                let bytes = image
                    .to_png()
                    .map_err(|e| HttpError::InvalidRequest(format!("cannot encode image: {e}")))?;
                (bytes, "image/png")
            }
        };

        let mut parts: Vec<FormPart> = self
            .fields
            .into_iter()
            .map(|(name, value)| FormPart::Text { name, value })
            .collect();
        parts.push(FormPart::File {
            name: self.name,
            filename,
            mime_type: mime_type.to_string(),
            bytes,
        });
        Ok(parts)
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

impl HttpClient {
    /// Upload a file or image as multipart form data.
    ///
    /// Responses are never cached or read from the cache. Failures come back
    /// as [`RequestOutcome::Failed`].
    pub async fn upload_file(&self, params: UploadParams) -> RequestOutcome {
        let url = params.url.clone();
        let method = params.method.clone();
        let headers = params.headers.clone();
        let timeout = Duration::from_millis(params.timeout_ms);
        let data_type = params.data_type;

        let result = match params.into_parts() {
            Ok(parts) => {
                debug!(%url, parts = parts.len(), "uploading");
                let request = TransportRequest {
                    url: url.clone(),
                    method,
                    headers,
                    body: Some(RequestBody::Multipart(parts)),
                    timeout,
                    allow_insecure: true,
                };
                self.execute(request, data_type).await
            }
            Err(e) => Err(e),
        };

        Self::outcome(&url, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{json_response, MockTransport};
    use scriptkit_config_and_utils::Paths;
    use scriptkit_storage::{KeyValueStore, MemoryStorage};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn client(mock: &Arc<MockTransport>) -> (TempDir, HttpClient) {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let storage = KeyValueStore::storage(&paths, Arc::new(MemoryStorage::new()));
        (dir, HttpClient::new(mock.clone(), storage))
    }

    fn multipart(mock: &MockTransport) -> Vec<FormPart> {
        match mock.requests().remove(0).body {
            Some(RequestBody::Multipart(parts)) => parts,
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_file_builds_multipart() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/upload", json!({"ok": true})));
        let (dir, client) = client(&mock);

        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let outcome = client
            .upload_file(
                UploadParams::new("https://example.com/upload", "file", UploadSource::File(path))
                    .filename("notes.txt")
                    .field("caption", "hi"),
            )
            .await;
        assert!(matches!(outcome, RequestOutcome::Fetched(_)));

        let parts = multipart(&mock);
        assert_eq!(
            parts,
            vec![
                FormPart::Text {
                    name: "caption".into(),
                    value: "hi".into(),
                },
                FormPart::File {
                    name: "file".into(),
                    filename: "notes.txt".into(),
                    mime_type: "text/plain".into(),
                    bytes: b"hello".to_vec(),
                },
            ]
        );
        assert_eq!(mock.requests()[0].method, Method::POST);
    }

    #[tokio::test]
    async fn test_upload_image_defaults_filename_to_timestamp() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/upload", json!({})));
        let (_dir, client) = client(&mock);

        let image = Image::solid(4, 4, [0, 255, 0, 255]);
        client
            .upload_file(UploadParams::new(
                "https://example.com/upload",
                "photo",
                UploadSource::Image(image),
            ))
            .await;

        let parts = multipart(&mock);
        match &parts[0] {
            FormPart::File {
                name,
                filename,
                mime_type,
                bytes,
            } => {
                assert_eq!(name, "photo");
                assert!(filename.parse::<i64>().is_ok());
                assert_eq!(mime_type, "image/png");
                assert_eq!(Image::from_bytes(bytes).unwrap().size(), (4, 4));
            }
            other => panic!("expected file part, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_is_never_cached() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/upload", json!({"id": 7})));
        let (_dir, client) = client(&mock);

        let outcome = client
            .upload_file(UploadParams::new(
                "https://example.com/upload",
                "file",
                UploadSource::Image(Image::placeholder()),
            ))
            .await;
        assert!(outcome.response().is_some());
        assert!(client.cached_response("https://example.com/upload").is_none());
    }

    #[tokio::test]
    async fn test_missing_file_fails_without_network() {
        let mock = Arc::new(MockTransport::new());
        let (dir, client) = client(&mock);

        let outcome = client
            .upload_file(UploadParams::new(
                "https://example.com/upload",
                "file",
                UploadSource::File(dir.path().join("missing.bin")),
            ))
            .await;
        assert!(matches!(outcome, RequestOutcome::Failed(HttpError::InvalidRequest(_))));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let mock = Arc::new(MockTransport::new());
        mock.push_err(HttpError::Timeout);
        let (_dir, client) = client(&mock);

        let outcome = client
            .upload_file(UploadParams::new(
                "https://example.com/upload",
                "file",
                UploadSource::Image(Image::placeholder()),
            ))
            .await;
        assert!(matches!(outcome, RequestOutcome::Failed(HttpError::Timeout)));
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a")), "application/octet-stream");
    }
}
