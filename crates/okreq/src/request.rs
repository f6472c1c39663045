//! Fluent request builder

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use okreq_log::{Level, Logger};
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::redirect;
use serde::Serialize;
use url::Url;

use crate::body::{Body, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::cookie::Cookie;
use crate::error::Error;
use crate::method::Method;
use crate::response::Response;

/// A fluent HTTP request.
///
/// Built with the per-verb constructors ([`get`](crate::get),
/// [`post`](crate::post), ...) or [`Request::new`], configured through
/// chained setters, and consumed by the terminal [`Request::send`].
///
/// Setters that can fail (an invalid header name, an unserializable JSON
/// payload) defer their error to `send()` so the chain stays fluent; the
/// first deferred error wins.
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: String,
    headers: HeaderMap,
    cookies: Vec<Cookie>,
    body: Option<Body>,
    query: Option<String>,
    basic_auth: Option<(String, Option<String>)>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    redirects: bool,
    debug: bool,
    print_body: bool,
    logger: Logger,
    client: Option<reqwest::Client>,
    err: Option<Error>,
}

impl Request {
    /// Start a request for `method` and `url`.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            body: None,
            query: None,
            basic_auth: None,
            timeout: None,
            proxy: None,
            redirects: true,
            debug: false,
            print_body: true,
            // Dumps are gated by the debug flag, not the logger threshold.
            logger: Logger::new(Level::Debug),
            client: None,
            err: None,
        }
    }

    /// The request's method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The request's URL as currently accumulated.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The accumulated header map.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Replace `key` with a single `value`.
    pub fn set_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match parse_header(key.as_ref(), value.as_ref()) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(err) => self.defer(err),
        }
        self
    }

    /// Append `value` to `key`, keeping any existing values.
    pub fn add_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match parse_header(key.as_ref(), value.as_ref()) {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(err) => self.defer(err),
        }
        self
    }

    /// Set the `User-Agent` header.
    pub fn set_user_agent(self, agent: impl AsRef<str>) -> Self {
        self.set_header("User-Agent", agent)
    }

    /// Set the `Referer` header.
    pub fn set_referer(self, referer: impl AsRef<str>) -> Self {
        self.set_header("Referer", referer)
    }

    /// Attach a cookie to the outgoing request.
    pub fn set_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Use `body` unchanged as the request payload.
    pub fn set_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    /// Serialize `payload` as the JSON request body and set
    /// `Content-Type: application/json`.
    pub fn set_json<T: Serialize + ?Sized>(mut self, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(value) => self.body = Some(Body::Json(value)),
            Err(err) => self.defer(Error::BodyEncode(err.to_string())),
        }
        self.set_header(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)
    }

    /// Use `form` pairs as a URL-encoded request body and set
    /// `Content-Type: application/x-www-form-urlencoded`.
    pub fn set_form<I, K, V>(mut self, form: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = form
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.body = Some(Body::Form(pairs));
        self.set_header(CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)
    }

    /// Authenticate with HTTP basic auth. Credential encoding is
    /// delegated to the transport at send time.
    pub fn set_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some((username.into(), Some(password.into())));
        self
    }

    /// Serialize `query` with `serde_urlencoded` and append it to the
    /// URL's query string at send time.
    pub fn set_query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        match serde_urlencoded::to_string(query) {
            Ok(encoded) if encoded.is_empty() => {}
            Ok(encoded) => self.query = Some(encoded),
            Err(err) => self.defer(Error::BodyEncode(err.to_string())),
        }
        self
    }

    /// Resolve `path` against the current URL.
    pub fn join(mut self, path: impl AsRef<str>) -> Self {
        match Url::parse(&self.url).and_then(|base| base.join(path.as_ref())) {
            Ok(resolved) => self.url = resolved.into(),
            Err(err) => self.defer(Error::Url(err)),
        }
        self
    }

    /// Bound the whole exchange by `timeout`.
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Follow redirects (the default) or return the first hop's response.
    pub fn set_redirects(mut self, follow: bool) -> Self {
        self.redirects = follow;
        self
    }

    /// Route the request through `proxy` (for example
    /// `http://localhost:8080`). A malformed proxy URL fails `send()`.
    pub fn set_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Dump the outgoing request and the response through the logger at
    /// debug level.
    pub fn set_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Include bodies in debug dumps (on by default).
    pub fn set_print_body(mut self, print_body: bool) -> Self {
        self.print_body = print_body;
        self
    }

    /// Logger used for debug dumps.
    pub fn set_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Send through `client` instead of building a fresh one.
    ///
    /// Client-level settings (proxy, redirect policy, cookie jar) belong
    /// to the injected client; cookies set on this request are sent as an
    /// explicit `Cookie` header instead of through a jar.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Execute the request and buffer the response.
    ///
    /// A fresh transport client is built per call (cookie jar seeded with
    /// the accumulated cookies, proxy, redirect policy) unless one was
    /// injected with [`Request::with_client`]. The response body is fully
    /// drained before the [`Response`] is returned.
    pub async fn send(mut self) -> Result<Response, Error> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }

        let mut url = Url::parse(&self.url)?;
        if let Some(query) = self.query.take() {
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                _ => query,
            };
            url.set_query(Some(&merged));
        }

        let injected = self.client.is_some();
        let client = match self.client.take() {
            Some(client) => client,
            None => self.build_client(&url)?,
        };

        let wants_content_type = !self.headers.contains_key(CONTENT_TYPE);
        let mut builder = client.request(self.method.into(), url);
        if !self.headers.is_empty() {
            builder = builder.headers(mem::take(&mut self.headers));
        }
        if injected && !self.cookies.is_empty() {
            let pairs: Vec<String> = self.cookies.iter().map(Cookie::pair).collect();
            builder = builder.header(COOKIE, pairs.join("; "));
        }
        if let Some((username, password)) = self.basic_auth.take() {
            builder = builder.basic_auth(username, password);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let request = match self.body.take() {
            Some(body) => {
                let bytes = body.to_bytes()?;
                if wants_content_type {
                    builder = builder.header(CONTENT_TYPE, body.content_type());
                }
                builder.body(bytes).build()?
            }
            None => builder.build()?,
        };

        if self.debug {
            self.dump_request(&request);
        }
        tracing::debug!("sending {} {}", request.method(), request.url());

        let response = client.execute(request).await.map_err(Error::from)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let cookies = response
            .cookies()
            .map(|cookie| Cookie::new(cookie.name(), cookie.value()))
            .collect();
        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| Error::BodyRead(err.to_string()))?
            .to_vec();

        let response = Response::new(status, headers, cookies, body, final_url);
        if self.debug {
            self.dump_response(&response);
        }
        Ok(response)
    }

    /// Transport client configured from the accumulated settings, with a
    /// cookie jar seeded from the request's cookies.
    fn build_client(&self, url: &Url) -> Result<reqwest::Client, Error> {
        let jar = Jar::default();
        for cookie in &self.cookies {
            jar.add_cookie_str(&cookie.pair(), url);
        }

        let mut builder = reqwest::Client::builder().cookie_provider(Arc::new(jar));
        if !self.redirects {
            builder = builder.redirect(redirect::Policy::none());
        }
        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|err| Error::Proxy(err.to_string()))?;
            builder = builder.proxy(proxy);
        }
        builder.build().map_err(|err| Error::Build(err.to_string()))
    }

    fn dump_request(&self, request: &reqwest::Request) {
        let mut dump = format!("> {} {}", request.method(), request.url());
        for (name, value) in request.headers() {
            let value = value.to_str().unwrap_or("<opaque>");
            dump.push_str(&format!("\n> {name}: {value}"));
        }
        if self.print_body {
            if let Some(bytes) = request.body().and_then(reqwest::Body::as_bytes) {
                dump.push('\n');
                dump.push_str(&String::from_utf8_lossy(bytes));
            }
        }
        self.logger.debug(dump);
    }

    fn dump_response(&self, response: &Response) {
        let mut dump = format!("< {} {}", response.status(), response.url());
        for (name, value) in response.header_map() {
            let value = value.to_str().unwrap_or("<opaque>");
            dump.push_str(&format!("\n< {name}: {value}"));
        }
        if self.print_body && !response.body().is_empty() {
            dump.push('\n');
            dump.push_str(&response.text());
        }
        self.logger.debug(dump);
    }

    fn defer(&mut self, err: Error) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }
}

fn parse_header(key: &str, value: &str) -> Result<(HeaderName, HeaderValue), Error> {
    let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| Error::Header {
        name: key.to_string(),
        message: err.to_string(),
    })?;
    let value = HeaderValue::from_str(value).map_err(|err| Error::Header {
        name: key.to_string(),
        message: err.to_string(),
    })?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_accumulate_headers() {
        let req = Request::new(Method::Get, "http://localhost/")
            .set_header("X-One", "a")
            .add_header("X-One", "b")
            .set_user_agent("okreq-test");

        let values: Vec<_> = req
            .header_map()
            .get_all("x-one")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        assert_eq!(values, ["a", "b"]);
        assert_eq!(
            req.header_map().get("user-agent").and_then(|v| v.to_str().ok()),
            Some("okreq-test")
        );
    }

    #[test]
    fn set_header_replaces_values() {
        let req = Request::new(Method::Get, "http://localhost/")
            .add_header("X-One", "a")
            .set_header("X-One", "b");
        let values: Vec<_> = req
            .header_map()
            .get_all("x-one")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        assert_eq!(values, ["b"]);
    }

    #[test]
    fn set_json_sets_content_type() {
        let req = Request::new(Method::Post, "http://localhost/").set_json(&serde_json::json!({
            "foo": "bar",
        }));
        assert_eq!(
            req.header_map().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn set_form_sets_content_type() {
        let req = Request::new(Method::Post, "http://localhost/").set_form([("Foo", "Bar")]);
        assert_eq!(
            req.header_map().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn join_resolves_relative_paths() {
        let req = Request::new(Method::Get, "http://localhost/api/").join("users?page=2");
        assert_eq!(req.url(), "http://localhost/api/users?page=2");
    }

    #[tokio::test]
    async fn invalid_url_fails_send() {
        let err = Request::new(Method::Get, "not a url")
            .send()
            .await
            .expect_err("malformed URL");
        assert!(matches!(err, Error::Url(_)));
    }

    #[tokio::test]
    async fn invalid_header_is_deferred_to_send() {
        let err = Request::new(Method::Get, "http://localhost/")
            .set_header("bad header", "value")
            .send()
            .await
            .expect_err("invalid header name");
        assert!(matches!(err, Error::Header { .. }));
    }

    #[tokio::test]
    async fn malformed_proxy_fails_send() {
        let err = Request::new(Method::Get, "http://localhost/")
            .set_proxy("☃")
            .send()
            .await
            .expect_err("malformed proxy URL");
        assert!(matches!(err, Error::Proxy(_)));
    }
}
