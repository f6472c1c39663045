//! Fluent convenience wrapper around `reqwest`.
//!
//! Requests are built with chained setters and executed with a terminal
//! [`Request::send`]; transport concerns (connection pooling, TLS,
//! redirect following, proxy resolution, the cookie jar) stay with the
//! underlying client stack. Responses come back fully buffered with
//! status, header, cookie and JSON/XML decode accessors.
//!
//! # Example
//!
//! ```no_run
//! use okreq::Cookie;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Greeting {
//!     message: String,
//! }
//!
//! async fn example() -> Result<(), okreq::Error> {
//!     let resp = okreq::get("https://api.example.com/greeting")
//!         .set_header("X-Request-Header", "Value")
//!         .set_cookie(Cookie::new("session", "abc123"))
//!         .send()
//!         .await?;
//!
//!     let greeting: Greeting = resp.json()?;
//!     println!("{} ({})", greeting.message, resp.status());
//!     Ok(())
//! }
//! ```

mod body;
mod cookie;
mod decode;
mod error;
mod header;
mod method;
mod request;
mod response;

pub use body::Body;
pub use cookie::Cookie;
pub use decode::{Decode, JsonDecoder, XmlDecoder};
pub use error::Error;
pub use method::Method;
pub use request::Request;
pub use response::Response;

/// Start a GET request.
pub fn get(url: impl Into<String>) -> Request {
    Request::new(Method::Get, url)
}

/// Start a HEAD request.
pub fn head(url: impl Into<String>) -> Request {
    Request::new(Method::Head, url)
}

/// Start a POST request.
pub fn post(url: impl Into<String>) -> Request {
    Request::new(Method::Post, url)
}

/// Start a PUT request.
pub fn put(url: impl Into<String>) -> Request {
    Request::new(Method::Put, url)
}

/// Start a PATCH request.
pub fn patch(url: impl Into<String>) -> Request {
    Request::new(Method::Patch, url)
}

/// Start a DELETE request.
pub fn delete(url: impl Into<String>) -> Request {
    Request::new(Method::Delete, url)
}

/// Start an OPTIONS request.
pub fn options(url: impl Into<String>) -> Request {
    Request::new(Method::Options, url)
}

/// Start a TRACE request.
pub fn trace(url: impl Into<String>) -> Request {
    Request::new(Method::Trace, url)
}

/// Start a CONNECT request.
pub fn connect(url: impl Into<String>) -> Request {
    Request::new(Method::Connect, url)
}
