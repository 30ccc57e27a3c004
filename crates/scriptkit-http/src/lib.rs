//! HTTP helpers for scriptkit.
//!
//! [`HttpClient::request`] issues one request and writes every successful
//! response into the durable key-value store under `url:<url>`. With
//! `use_cache` set, a stored response is returned without touching the network.
//! Failures never surface as `Err`: the caller gets a [`RequestOutcome`] that
//! either carries a stale cached response or the error itself.
//!
//! [`ImageResolver`] builds on the client to load images from disk, the
//! temporary cache, or the network, substituting a placeholder on any failure.
//!
//! # Usage
//!
//! ```ignore
//! use scriptkit_http::{HttpClient, RequestParams, DataType};
//!
//! let client = HttpClient::with_reqwest(storage)?;
//! let outcome = client
//!     .request(RequestParams::get("https://example.com/api").use_cache(true))
//!     .await;
//! if let Some(response) = outcome.response() {
//!     println!("{} {:?}", response.status_code, response.data);
//! }
//! ```

mod client;
mod error;
mod images;
mod transport;
mod types;
mod upload;

#[cfg(test)]
mod testing;

pub use client::{cache_key, HttpClient};
pub use error::{HttpError, HttpResult};
pub use images::{image_cache_key, ImageParams, ImageResolver};
pub use transport::{parse_set_cookie, ReqwestTransport, Transport, TransportRequest, TransportResponse};
pub use types::{
    Cookie, DataType, FormPart, RequestBody, RequestOutcome, RequestParams, ResponseBody,
    ResponseType,
};
pub use upload::{UploadParams, UploadSource};

pub use reqwest::Method;
