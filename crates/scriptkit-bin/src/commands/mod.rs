//! CLI command implementations.

mod http;
mod settings;
mod storage;
mod ui;

pub use http::{fetch, image, upload, FetchArgs, UploadArgs};
pub use settings::{settings_get, settings_set};
pub use storage::{storage_get, storage_remove, storage_set};
pub use ui::{choose, crop, notify, prompt, NotifyArgs};

use anyhow::{Context as _, Result};
use scriptkit_config_and_utils::{Config, Paths};
use scriptkit_http::HttpClient;
use scriptkit_storage::{create_storage, service_name, KeyValueStore, SecureStorage, StorageScope};
use serde_json::Value;
use std::sync::Arc;

/// Script name used when the config does not name one.
const DEFAULT_SCRIPT_NAME: &str = "default";

/// Resolved configuration and directories for one invocation.
pub struct Context {
    pub paths: Paths,
    pub config: Config,
}

impl Context {
    pub fn load() -> Result<Self> {
        let paths = Paths::new()?;
        let config = Config::load(&paths)?;
        let paths = paths.with_cloud_dir(config.cloud_dir.clone());
        paths.ensure_dirs()?;
        Ok(Self { paths, config })
    }

    pub fn script_name(&self) -> &str {
        self.config
            .script_name
            .as_deref()
            .unwrap_or(DEFAULT_SCRIPT_NAME)
    }

    fn secure(&self, scope: StorageScope) -> Result<Arc<dyn SecureStorage>> {
        let service = service_name(self.script_name(), scope);
        let storage = create_storage(&service)
            .with_context(|| format!("opening secure storage {service}"))?;
        Ok(Arc::from(storage))
    }

    pub fn store(&self, scope: StorageScope) -> Result<KeyValueStore> {
        Ok(KeyValueStore::new(scope, &self.paths, self.secure(scope)?))
    }

    pub fn http_client(&self) -> Result<HttpClient> {
        Ok(HttpClient::with_reqwest(self.store(StorageScope::Durable)?)?)
    }
}

/// Parse `value` as JSON, falling back to a plain string.
pub fn parse_value(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Parse `KEY=VALUE` (or `KEY:VALUE` for headers).
pub fn parse_pair(raw: &str, separator: char) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once(separator)
        .ok_or_else(|| format!("expected KEY{separator}VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Parse a `KEY=VALUE` argument.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    parse_pair(raw, '=')
}

/// Parse a `Name: value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    parse_pair(raw, ':')
}

/// Validate an absolute http(s) URL.
pub fn parse_url(raw: &str) -> Result<String, String> {
    let url = url::Url::parse(raw).map_err(|e| format!("invalid URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(format!("unsupported URL scheme: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value(r#"{"a":[1,2]}"#), json!({"a": [1, 2]}));
        assert_eq!(parse_value("hello world"), json!("hello world"));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn test_parse_pairs() {
        assert_eq!(parse_field("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert_eq!(
            parse_header("Content-Type: text/plain").unwrap(),
            ("Content-Type".into(), "text/plain".into())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com/api?q=1").is_ok());
        assert!(parse_url("ftp://example.com").is_err());
        assert!(parse_url("not a url").is_err());
    }
}
