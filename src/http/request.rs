//! HTTP request representation and parsing via the [`httparse`] crate.
//!
//! A [`Request`] is either built directly by the embedding pipeline
//! ([`Request::new`]) or parsed from raw HTTP/1.1 bytes ([`Request::parse`]).
//! The path and query string are split once at construction time; the router
//! matches on the path exactly as stored here, with no further normalization.

use bytes::Bytes;
use thiserror::Error;

use super::{Headers, Method};

/// Errors that can occur while parsing an HTTP/1.1 request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is incomplete — more data needed")]
    Incomplete,

    #[error("HTTP parse error: {0}")]
    Parse(#[from] httparse::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

/// An incoming HTTP request.
///
/// The router treats this as an opaque carrier of a URI path: it looks the
/// path up in its route table and hands the whole request to the matched
/// handler, which takes ownership for the rest of its short life.
///
/// # Examples
///
/// ```
/// use junction::http::Request;
///
/// let raw = b"GET /hello?name=world HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let request = Request::parse(raw).unwrap();
///
/// assert_eq!(request.method().as_str(), "GET");
/// assert_eq!(request.path(), "/hello");
/// assert_eq!(request.query_string(), Some("name=world"));
/// assert_eq!(request.headers().get("host"), Some("localhost"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Maximum number of headers supported per request.
    const MAX_HEADERS: usize = 64;

    /// Creates a request directly, without going through the wire parser.
    ///
    /// Intended for pipelines that already hold a decoded request, and for
    /// tests. A query string embedded in `path` is split off, mirroring
    /// [`parse`](Self::parse).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let raw_path: String = path.into();
        let (path, query) = split_target(&raw_path);
        Self {
            method,
            path,
            query,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Adds a header to the request (builder style).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the request body (builder style).
    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Parses a raw HTTP/1.1 request from a byte slice.
    ///
    /// Everything after the `\r\n\r\n` header terminator is taken as the body.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Incomplete`] — the header section is not yet complete.
    /// - [`RequestError::Parse`] — the data is malformed.
    /// - [`RequestError::MissingField`] — method or path is absent.
    pub fn parse(buf: &[u8]) -> Result<Self, RequestError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw = httparse::Request::new(&mut headers);

        let body_offset = match raw.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(RequestError::Incomplete),
        };

        let method: Method = raw
            .method
            .ok_or(RequestError::MissingField { field: "method" })?
            .parse()
            .unwrap(); // Infallible

        let target = raw
            .path
            .ok_or(RequestError::MissingField { field: "path" })?;
        let (path, query) = split_target(target);

        let mut header_map = Headers::with_capacity(raw.headers.len());
        for header in raw.headers.iter() {
            if let Ok(value) = std::str::from_utf8(header.value) {
                header_map.append(header.name, value);
            }
        }

        Ok(Self {
            method,
            path,
            query,
            headers: header_map,
            body: Bytes::copy_from_slice(&buf[body_offset..]),
        })
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without the query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`), if any.
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserializes the request body as JSON.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
    }
}

// Splits a request target into path and optional query string.
fn split_target(target: &str) -> (String, Option<String>) {
    match target.find('?') {
        Some(pos) => (
            target[..pos].to_owned(),
            Some(target[pos + 1..].to_owned()),
        ),
        None => (target.to_owned(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.method().as_str(), "GET");
        assert_eq!(req.path(), "/");
        assert_eq!(req.headers().get("host"), Some("localhost"));
        assert!(req.body().is_empty());
    }

    #[test]
    fn parse_splits_query_string() {
        let raw = b"GET /search?q=rust&page=2 HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query_string(), Some("q=rust&page=2"));
    }

    #[test]
    fn parse_keeps_trailing_slash() {
        // Path normalization is the caller's business, not ours.
        let raw = b"GET /hello/ HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.path(), "/hello/");
    }

    #[test]
    fn parse_body() {
        let raw = b"POST /submit HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.body().as_ref(), b"hello");
    }

    #[test]
    fn parse_incomplete() {
        let raw = b"GET / HTTP/1.1\r\nHost:";
        assert!(matches!(Request::parse(raw), Err(RequestError::Incomplete)));
    }

    #[test]
    fn direct_construction_splits_query() {
        let req = Request::new(Method::Get, "/hello?name=world");
        assert_eq!(req.path(), "/hello");
        assert_eq!(req.query_string(), Some("name=world"));
    }

    #[test]
    fn builder_header_and_body() {
        let req = Request::new(Method::Post, "/submit")
            .header("Content-Type", "application/json")
            .body_bytes(&br#"{"id":7}"#[..]);
        assert_eq!(req.headers().get("content-type"), Some("application/json"));

        #[derive(Deserialize)]
        struct Payload {
            id: u32,
        }
        let payload: Payload = req.json().unwrap();
        assert_eq!(payload.id, 7);
    }
}
