//! Request parameters and response shapes.

use crate::{HttpError, HttpResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use scriptkit_config_and_utils::DEFAULT_REQUEST_TIMEOUT_MS;
use scriptkit_storage::Image;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Json,
    Text,
    Image,
    Data,
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "string" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "data" => Ok(Self::Data),
            other => Err(format!("unknown data type: {other}")),
        }
    }
}

/// One multipart form part.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Bytes(Vec<u8>),
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// Parameters for [`crate::HttpClient::request`].
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
    pub timeout_ms: u64,
    /// Serve a stored response, if any, instead of going to the network.
    pub use_cache: bool,
    pub data_type: DataType,
}

impl RequestParams {
    /// GET request with default timeout, JSON decoding, and no cache read.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            use_cache: false,
            data_type: DataType::Json,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }
}

/// A cookie set by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Image(Image),
    Data(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl ResponseBody {
    /// Decode raw bytes as `data_type`.
    pub fn decode(data_type: DataType, bytes: Vec<u8>) -> HttpResult<Self> {
        match data_type {
            DataType::Json => serde_json::from_slice(&bytes)
                .map(ResponseBody::Json)
                .map_err(|e| HttpError::Decode(format!("invalid JSON body: {e}"))),
            DataType::Text => Ok(ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned())),
            DataType::Image => Image::from_bytes(&bytes)
                .map(ResponseBody::Image)
                .map_err(|e| HttpError::Decode(format!("invalid image body: {e}"))),
            DataType::Data => Ok(ResponseBody::Data(bytes)),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            ResponseBody::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// Response metadata merged with the decoded body.
///
/// Stored verbatim (as JSON) in the durable key-value store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseType {
    pub url: String,
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub cookies: Vec<Cookie>,
    pub mime_type: Option<String>,
    pub data: ResponseBody,
}

/// What a request produced.
///
/// Requests never fail with `Err`; failures are folded into this type.
#[derive(Debug)]
pub enum RequestOutcome {
    /// Fresh response from the network.
    Fetched(ResponseType),
    /// Stored response served without a network call.
    Cached(ResponseType),
    /// Network failed; a stored response was substituted.
    Fallback {
        response: ResponseType,
        error: HttpError,
    },
    /// Network failed and nothing was stored.
    Failed(HttpError),
}

impl RequestOutcome {
    /// The response, unless the request failed outright.
    pub fn response(&self) -> Option<&ResponseType> {
        match self {
            Self::Fetched(response) | Self::Cached(response) => Some(response),
            Self::Fallback { response, .. } => Some(response),
            Self::Failed(_) => None,
        }
    }

    pub fn into_response(self) -> Option<ResponseType> {
        match self {
            Self::Fetched(response) | Self::Cached(response) => Some(response),
            Self::Fallback { response, .. } => Some(response),
            Self::Failed(_) => None,
        }
    }

    /// The network error, if one occurred.
    pub fn error(&self) -> Option<&HttpError> {
        match self {
            Self::Fallback { error, .. } | Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the response came from storage rather than the network.
    pub fn is_from_cache(&self) -> bool {
        matches!(self, Self::Cached(_) | Self::Fallback { .. })
    }

    /// Response (fresh or stored) as `Ok`, or the error when nothing is available.
    pub fn into_result(self) -> HttpResult<ResponseType> {
        match self {
            Self::Fetched(response) | Self::Cached(response) => Ok(response),
            Self::Fallback { response, .. } => Ok(response),
            Self::Failed(error) => Err(error),
        }
    }
}

mod base64_bytes {
    use super::BASE64;
    use base64::Engine;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded.as_bytes()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_params_defaults() {
        let params = RequestParams::get("https://example.com");
        assert_eq!(params.method, Method::GET);
        assert_eq!(params.timeout_ms, 60_000);
        assert_eq!(params.data_type, DataType::Json);
        assert!(!params.use_cache);
        assert!(params.body.is_none());
    }

    #[test]
    fn test_data_type_parsing() {
        assert_eq!("JSON".parse::<DataType>().unwrap(), DataType::Json);
        assert_eq!("string".parse::<DataType>().unwrap(), DataType::Text);
        assert_eq!("image".parse::<DataType>().unwrap(), DataType::Image);
        assert_eq!("data".parse::<DataType>().unwrap(), DataType::Data);
        assert!("xml".parse::<DataType>().is_err());
    }

    #[test]
    fn test_decode_dispatch() {
        assert_eq!(
            ResponseBody::decode(DataType::Json, br#"{"a":1}"#.to_vec()).unwrap(),
            ResponseBody::Json(json!({"a": 1}))
        );
        assert_eq!(
            ResponseBody::decode(DataType::Text, b"plain".to_vec()).unwrap(),
            ResponseBody::Text("plain".into())
        );
        assert_eq!(
            ResponseBody::decode(DataType::Data, vec![0, 1]).unwrap(),
            ResponseBody::Data(vec![0, 1])
        );

        let png = Image::solid(2, 3, [0, 0, 0, 255]).to_png().unwrap();
        let body = ResponseBody::decode(DataType::Image, png).unwrap();
        assert_eq!(body.as_image().unwrap().size(), (2, 3));
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            ResponseBody::decode(DataType::Json, b"<html>".to_vec()),
            Err(HttpError::Decode(_))
        ));
        assert!(matches!(
            ResponseBody::decode(DataType::Image, b"nope".to_vec()),
            Err(HttpError::Decode(_))
        ));
    }

    #[test]
    fn test_response_serializes_verbatim() {
        let response = ResponseType {
            url: "https://example.com/bin".into(),
            status_code: 200,
            headers: BTreeMap::from([("content-type".into(), "application/octet-stream".into())]),
            cookies: vec![Cookie {
                name: "sid".into(),
                value: "1".into(),
                domain: None,
                path: Some("/".into()),
            }],
            mime_type: Some("application/octet-stream".into()),
            data: ResponseBody::Data(vec![1, 2, 3]),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"], json!({"type": "data", "value": "AQID"}));

        let back: ResponseType = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = RequestOutcome::Failed(HttpError::Timeout);
        assert!(failed.response().is_none());
        assert!(failed.error().is_some());
        assert!(!failed.is_from_cache());
        assert!(matches!(failed.into_result(), Err(HttpError::Timeout)));
    }
}
