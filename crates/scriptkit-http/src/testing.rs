//! Scripted transport for tests.

use crate::{HttpError, HttpResult, Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

/// Replays queued results in order and records every request it sees.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<HttpResult<TransportResponse>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_ok(&self, response: TransportResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    pub(crate) fn push_err(&self, error: HttpError) {
        self.responses.lock().push_back(Err(error));
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> HttpResult<TransportResponse> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::Transport("no scripted response".into())))
    }
}

pub(crate) fn bytes_response(url: &str, body: Vec<u8>, mime_type: &str) -> TransportResponse {
    TransportResponse {
        url: url.to_string(),
        status_code: 200,
        headers: BTreeMap::from([("content-type".to_string(), mime_type.to_string())]),
        cookies: Vec::new(),
        mime_type: Some(mime_type.to_string()),
        body,
    }
}

pub(crate) fn json_response(url: &str, body: Value) -> TransportResponse {
    bytes_response(url, body.to_string().into_bytes(), "application/json")
}
