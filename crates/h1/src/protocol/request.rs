//! Decoded request types.
//!
//! A [`Request`] is produced by [`RequestDecoder`](crate::codec::RequestDecoder)
//! once the whole message has been read. It is read-only from then on.

use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::protocol::{DecodeError, Headers};

/// The first line of a request, e.g. `GET /coffee HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    pub fn new(method: impl Into<String>, target: impl Into<String>, version: impl Into<String>) -> Self {
        Self { method: method.into(), target: target.into(), version: version.into() }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The version without the `HTTP/` prefix, always `"1.1"` for a decoded request.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A fully decoded HTTP/1.1 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: Bytes,
    content_length: Option<u64>,
}

impl Request {
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    pub fn version(&self) -> &str {
        self.request_line.version()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The declared body length, `None` when the request carried no `Content-Length`.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn into_parts(self) -> (RequestLine, Headers, Bytes) {
        (self.request_line, self.headers, self.body)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Request line:")?;
        writeln!(f, "- Method: {}", self.method())?;
        writeln!(f, "- Target: {}", self.target())?;
        writeln!(f, "- Version: {}", self.version())?;
        writeln!(f, "Headers:")?;
        write!(f, "{}", self.headers)?;
        if !self.body.is_empty() {
            writeln!(f, "Body:")?;
            writeln!(f, "{}", String::from_utf8_lossy(&self.body))?;
        }
        Ok(())
    }
}

/// The pieces of a request while it is still being decoded.
///
/// Owned by the decoder; fields fill in as the decoder moves through its states.
#[derive(Debug, Default)]
pub(crate) struct RequestParts {
    pub(crate) request_line: Option<RequestLine>,
    pub(crate) headers: Headers,
    pub(crate) body: BytesMut,
    pub(crate) content_length: Option<u64>,
}

impl RequestParts {
    /// Freezes the collected parts into a [`Request`].
    ///
    /// Fails with [`DecodeError::InvalidState`] when no request line was stored,
    /// which the decoder's state order rules out.
    pub(crate) fn into_request(self) -> Result<Request, DecodeError> {
        let request_line = self.request_line.ok_or(DecodeError::invalid_state("request line missing when finishing request"))?;

        Ok(Request { request_line, headers: self.headers, body: self.body.freeze(), content_length: self.content_length })
    }
}
