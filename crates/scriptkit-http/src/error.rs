//! HTTP error types.

use thiserror::Error;

/// Error produced while building, sending, or decoding a request.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Connection, TLS, or protocol failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded its timeout
    #[error("Request timed out")]
    Timeout,

    /// Body could not be decoded as the requested data type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request could not be built (bad header, unreadable upload file)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            HttpError::Decode(err.to_string())
        } else {
            HttpError::Transport(err.to_string())
        }
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;
