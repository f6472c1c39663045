//! Error types

use thiserror::Error;

/// Errors surfaced while building or sending a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The request URL failed to parse
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Unknown HTTP verb
    #[error("Unsupported method: {0}")]
    Method(String),
    /// Invalid header name or value
    #[error("Invalid header {name}: {message}")]
    Header {
        /// Header name as given by the caller
        name: String,
        /// What the header map rejected
        message: String,
    },
    /// Body encode failure (structured encodings only)
    #[error("Body encode error: {0}")]
    BodyEncode(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Transport failure below the HTTP layer
    #[error("Transport error: {0}")]
    Transport(String),
    /// Failure draining the response body
    #[error("Body read error: {0}")]
    BodyRead(String),
    /// Malformed proxy configuration
    #[error("Proxy error: {0}")]
    Proxy(String),
    /// Client build error
    #[error("Client build error: {0}")]
    Build(String),
    /// Response decode failure
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Connection(err.to_string())
        } else if err.is_builder() {
            Error::Build(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Error::BodyRead(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}
