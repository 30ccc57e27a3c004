//! Cached request execution.

use crate::{
    DataType, HttpError, HttpResult, RequestOutcome, RequestParams, ResponseBody, ResponseType,
    ReqwestTransport, Transport, TransportRequest,
};
use scriptkit_storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Storage key for the cached response of `url`.
pub fn cache_key(url: &str) -> String {
    format!("url:{url}")
}

/// Issues requests and mirrors every successful response into a key-value store.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    storage: KeyValueStore,
}

impl HttpClient {
    /// `storage` receives cached responses; callers normally pass the durable store.
    pub fn new(transport: Arc<dyn Transport>, storage: KeyValueStore) -> Self {
        Self { transport, storage }
    }

    pub fn with_reqwest(storage: KeyValueStore) -> HttpResult<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new()?), storage))
    }

    pub fn storage(&self) -> &KeyValueStore {
        &self.storage
    }

    /// The stored response for `url`, if any. Unreadable entries count as absent.
    pub fn cached_response(&self, url: &str) -> Option<ResponseType> {
        match self.storage.get_json::<ResponseType>(&cache_key(url)) {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "ignoring unreadable cached response");
                None
            }
        }
    }

    /// Perform `params`.
    ///
    /// With `use_cache`, a stored response is returned without a network call,
    /// however old it is. Every successful fetch overwrites the stored response,
    /// whether or not `use_cache` was set. A failed fetch falls back to the
    /// stored response when there is one.
    pub async fn request(&self, params: RequestParams) -> RequestOutcome {
        if params.use_cache {
            if let Some(cached) = self.cached_response(&params.url) {
                debug!(url = %params.url, "serving cached response");
                return RequestOutcome::Cached(cached);
            }
        }

        let url = params.url.clone();
        let data_type = params.data_type;
        let request = TransportRequest {
            url: params.url,
            method: params.method,
            headers: params.headers,
            body: params.body,
            timeout: Duration::from_millis(params.timeout_ms),
            allow_insecure: true,
        };

        match self.execute(request, data_type).await {
            Ok(response) => {
                if let Err(e) = self.storage.set_json(&cache_key(&url), &response) {
                    warn!(%url, error = %e, "failed to cache response");
                }
                RequestOutcome::Fetched(response)
            }
            Err(error) => match self.cached_response(&url) {
                Some(response) => {
                    warn!(%url, %error, "request failed, serving cached response");
                    RequestOutcome::Fallback { response, error }
                }
                None => {
                    warn!(%url, %error, "request failed");
                    RequestOutcome::Failed(error)
                }
            },
        }
    }

    /// Send `request` and decode its body as `data_type`. No caching.
    pub(crate) async fn execute(
        &self,
        request: TransportRequest,
        data_type: DataType,
    ) -> HttpResult<ResponseType> {
        let raw = self.transport.send(request).await?;
        let data = ResponseBody::decode(data_type, raw.body)?;
        Ok(ResponseType {
            url: raw.url,
            status_code: raw.status_code,
            headers: raw.headers,
            cookies: raw.cookies,
            mime_type: raw.mime_type,
            data,
        })
    }

    pub(crate) fn outcome(url: &str, result: Result<ResponseType, HttpError>) -> RequestOutcome {
        match result {
            Ok(response) => RequestOutcome::Fetched(response),
            Err(error) => {
                warn!(url, %error, "request failed");
                RequestOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{json_response, MockTransport};
    use crate::{Method, RequestBody};
    use scriptkit_config_and_utils::Paths;
    use scriptkit_storage::MemoryStorage;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    fn client(mock: &Arc<MockTransport>) -> (TempDir, HttpClient) {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let storage = KeyValueStore::storage(&paths, Arc::new(MemoryStorage::new()));
        (dir, HttpClient::new(mock.clone(), storage))
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("https://example.com/api"), "url:https://example.com/api");
    }

    #[tokio::test]
    async fn test_successful_request_is_cached() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/api", json!({"temp": 21})));
        let (_dir, client) = client(&mock);

        let outcome = client.request(RequestParams::get("https://example.com/api")).await;
        assert!(matches!(outcome, RequestOutcome::Fetched(_)));

        let cached = client.cached_response("https://example.com/api").unwrap();
        assert_eq!(cached.data, ResponseBody::Json(json!({"temp": 21})));
        assert_eq!(cached.status_code, 200);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/api", json!({"v": 1})));
        let (_dir, client) = client(&mock);

        client.request(RequestParams::get("https://example.com/api")).await;
        assert_eq!(mock.calls(), 1);

        let outcome = client
            .request(RequestParams::get("https://example.com/api").use_cache(true))
            .await;
        assert!(matches!(outcome, RequestOutcome::Cached(_)));
        assert_eq!(outcome.response().unwrap().data, ResponseBody::Json(json!({"v": 1})));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_use_cache_false_refreshes_cache() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/api", json!({"v": 1})));
        mock.push_ok(json_response("https://example.com/api", json!({"v": 2})));
        let (_dir, client) = client(&mock);

        client.request(RequestParams::get("https://example.com/api")).await;
        client.request(RequestParams::get("https://example.com/api")).await;

        let outcome = client
            .request(RequestParams::get("https://example.com/api").use_cache(true))
            .await;
        assert_eq!(outcome.response().unwrap().data, ResponseBody::Json(json!({"v": 2})));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_use_cache_miss_goes_to_network() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/api", json!([1, 2])));
        let (_dir, client) = client(&mock);

        let outcome = client
            .request(RequestParams::get("https://example.com/api").use_cache(true))
            .await;
        assert!(matches!(outcome, RequestOutcome::Fetched(_)));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_with_cache_falls_back() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/api", json!({"v": 1})));
        mock.push_err(HttpError::Timeout);
        let (_dir, client) = client(&mock);

        client.request(RequestParams::get("https://example.com/api")).await;
        let outcome = client.request(RequestParams::get("https://example.com/api")).await;

        match outcome {
            RequestOutcome::Fallback { response, error } => {
                assert_eq!(response.data, ResponseBody::Json(json!({"v": 1})));
                assert!(matches!(error, HttpError::Timeout));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_without_cache_returns_error() {
        let mock = Arc::new(MockTransport::new());
        mock.push_err(HttpError::Transport("connection refused".into()));
        let (_dir, client) = client(&mock);

        let outcome = client.request(RequestParams::get("https://example.com/down")).await;
        assert!(matches!(outcome, RequestOutcome::Failed(HttpError::Transport(_))));
        assert!(client.cached_response("https://example.com/down").is_none());
    }

    #[tokio::test]
    async fn test_decode_failure_is_absorbed() {
        let mock = Arc::new(MockTransport::new());
        let mut response = json_response("https://example.com/html", json!(null));
        response.body = b"<html></html>".to_vec();
        mock.push_ok(response);
        let (_dir, client) = client(&mock);

        let outcome = client.request(RequestParams::get("https://example.com/html")).await;
        assert!(matches!(outcome, RequestOutcome::Failed(HttpError::Decode(_))));
    }

    #[tokio::test]
    async fn test_request_is_forwarded_to_transport() {
        let mock = Arc::new(MockTransport::new());
        mock.push_ok(json_response("https://example.com/echo", json!({})));
        let (_dir, client) = client(&mock);

        client
            .request(
                RequestParams::get("https://example.com/echo")
                    .method(Method::POST)
                    .header("X-Token", "abc")
                    .body(RequestBody::Json(json!({"q": 1})))
                    .timeout_ms(1_500)
                    .data_type(DataType::Text),
            )
            .await;

        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].headers.get("X-Token").map(String::as_str), Some("abc"));
        assert_eq!(sent[0].body, Some(RequestBody::Json(json!({"q": 1}))));
        assert_eq!(sent[0].timeout, Duration::from_millis(1_500));
        assert!(sent[0].allow_insecure);
    }

    #[tokio::test]
    async fn test_non_success_status_is_still_a_response() {
        let mock = Arc::new(MockTransport::new());
        let mut response = json_response("https://example.com/missing", json!({"error": "nope"}));
        response.status_code = 404;
        mock.push_ok(response);
        let (_dir, client) = client(&mock);

        let outcome = client.request(RequestParams::get("https://example.com/missing")).await;
        assert_eq!(outcome.response().unwrap().status_code, 404);
    }
}
