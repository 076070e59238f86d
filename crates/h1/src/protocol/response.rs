//! Response type written back by the server.
//!
//! Status codes come from the `http` crate; headers reuse [`Headers`] so the
//! same folding rules apply on both sides of a connection.

use bytes::Bytes;
use http::StatusCode;

use crate::protocol::Headers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// A response carrying `body` as `text/plain` with the default headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self { status, headers: default_headers(body.len()), body }
    }

    /// A response with an empty body, used for error replies.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Bytes::new())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// `content-length`, `connection: close` and `content-type: text/plain`.
///
/// Connections are never reused, so every response announces `close`.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("Content-Length", &content_len.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}
