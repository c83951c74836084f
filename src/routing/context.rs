//! Per-request exchange state handed to handlers.
//!
//! # Responsibilities
//! - Carry the inbound method, path, headers and body
//! - Collect the response status, headers and body written by a handler
//! - Hold parameter bindings for the duration of one handler call

use std::collections::HashMap;
use std::fmt;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};

/// Request/response exchange for a single dispatch.
///
/// Writing through [`fmt::Write`] appends to the response body, so handlers
/// can use `write!(ctx, ...)`.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Vec<u8>,
}

impl RequestContext {
    /// Create a context for `path` with an empty request body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Vec::new(),
        }
    }

    /// Shorthand for a `GET` with no headers or body.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw request path, as delivered by the transport.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Value bound to `name` by the matched pattern, if any.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Bind raw path segments. Values are percent-decoded; a value that
    /// does not decode to UTF-8 is kept as sent.
    pub(crate) fn bind_params<'a>(&mut self, bindings: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.params.extend(bindings.into_iter().map(|(name, value)| {
            let decoded = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            (name.to_string(), decoded)
        }));
    }

    pub(crate) fn clear_params(&mut self) {
        self.params.clear();
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn set_content_type(&mut self, value: HeaderValue) {
        self.response_headers.insert(header::CONTENT_TYPE, value);
    }

    /// Append raw bytes to the response body.
    pub fn write_body(&mut self, bytes: impl AsRef<[u8]>) {
        self.response_body.extend_from_slice(bytes.as_ref());
    }

    /// Replace the response body.
    pub fn set_body(&mut self, bytes: impl Into<Vec<u8>>) {
        self.response_body = bytes.into();
    }

    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// Response body as text, replacing invalid UTF-8.
    pub fn response_text(&self) -> String {
        String::from_utf8_lossy(&self.response_body).into_owned()
    }

    /// Split into the parts a transport needs to build its response.
    pub fn into_response_parts(self) -> (StatusCode, HeaderMap, Vec<u8>) {
        (self.status, self.response_headers, self.response_body)
    }
}

impl fmt::Write for RequestContext {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.response_body.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
