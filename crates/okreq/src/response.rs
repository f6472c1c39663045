//! HTTP response snapshot

use std::borrow::Cow;
use std::collections::HashMap;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::cookie::Cookie;
use crate::decode::Decode;
use crate::error::Error;
use crate::header;

/// Buffered response returned by [`Request::send`](crate::Request::send).
///
/// The body is fully drained before this value is constructed; every
/// accessor is read-only.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    cookies: Vec<Cookie>,
    body: Vec<u8>,
    url: Url,
}

impl Response {
    pub(crate) fn new(
        status: u16,
        headers: HeaderMap,
        cookies: Vec<Cookie>,
        body: Vec<u8>,
        url: Url,
    ) -> Self {
        Self {
            status,
            headers,
            cookies,
            body,
            url,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is a success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Whether the status is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Final URL of the exchange, after any redirects the client followed.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// First value of `key`, if present and valid UTF-8. Lookup is
    /// case-insensitive.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|value| value.to_str().ok())
    }

    /// All headers flattened to their first values.
    pub fn headers(&self) -> HashMap<String, String> {
        header::flatten(&self.headers)
    }

    /// The raw header multimap.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Cookies the server set on this response.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// The raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, lossy for non-UTF-8 bytes.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|err| Error::Decode(err.to_string()))
    }

    /// Deserialize the body as XML.
    pub fn xml<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let text = std::str::from_utf8(&self.body).map_err(|err| Error::Decode(err.to_string()))?;
        quick_xml::de::from_str(text).map_err(|err| Error::Decode(err.to_string()))
    }

    /// Run a pluggable decoder over the buffered body.
    pub fn decode(&self, decoder: &mut impl Decode) -> Result<(), Error> {
        decoder.decode(&self.body)
    }
}
