//! Network transport seam.

use crate::{Cookie, FormPart, HttpResult, RequestBody};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// A fully specified request handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
    pub timeout: Duration,
    /// Accept invalid or self-signed TLS certificates.
    pub allow_insecure: bool,
}

/// Raw response: metadata plus undecoded body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub cookies: Vec<Cookie>,
    pub mime_type: Option<String>,
    pub body: Vec<u8>,
}

/// Performs one network exchange.
///
/// Any HTTP status counts as a completed exchange; only transport-level
/// problems (connect, TLS, timeout) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> HttpResult<TransportResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    strict: reqwest::Client,
    insecure: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> HttpResult<Self> {
        let strict = reqwest::Client::builder().build()?;
        let insecure = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { strict, insecure })
    }

    fn build_form(parts: Vec<FormPart>) -> HttpResult<Form> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    filename,
                    mime_type,
                    bytes,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(filename)
                        .mime_str(&mime_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> HttpResult<TransportResponse> {
        let client = if request.allow_insecure {
            &self.insecure
        } else {
            &self.strict
        };

        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = client
            .request(request.method, &request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Text(text)) => builder.body(text),
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(parts)) => builder.multipart(Self::build_form(parts)?),
        };

        let response = builder.send().await?;

        let url = response.url().to_string();
        let status_code = response.status().as_u16();

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        let cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(parse_set_cookie)
            .collect();

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let body = response.bytes().await?.to_vec();
        debug!(%url, status_code, bytes = body.len(), "received response");

        Ok(TransportResponse {
            url,
            status_code,
            headers,
            cookies,
            mime_type,
            body,
        })
    }
}

/// Parse one `Set-Cookie` header value. Attributes other than `Domain` and
/// `Path` are ignored.
pub fn parse_set_cookie(raw: &str) -> Option<Cookie> {
    let mut segments = raw.split(';');
    let (name, value) = segments.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = Cookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
        domain: None,
        path: None,
    };

    for attribute in segments {
        let Some((key, value)) = attribute.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "domain" => cookie.domain = Some(value.trim().to_string()),
            "path" => cookie.path = Some(value.trim().to_string()),
            _ => {}
        }
    }

    Some(cookie)
}
