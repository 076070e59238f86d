use std::io;
use thiserror::Error;

use crate::protocol::Request;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: DecodeError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Everything that can abort decoding a request.
///
/// Every variant is terminal for the request being decoded. Only
/// [`DecodeError::ContentLengthMismatch`] hands back the partially decoded
/// request.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed request line: {line:?}")]
    MalformedRequestLine { line: String },

    #[error("malformed http version: {version:?}")]
    MalformedVersion { version: String },

    #[error("unsupported http version: {version:?}, only 1.1 is accepted")]
    UnsupportedVersion { version: String },

    #[error("malformed header line: {line:?}")]
    MalformedHeader { line: String },

    #[error("whitespace between field name {name:?} and colon")]
    InvalidFieldSpacing { name: String },

    #[error("field name {name:?} is not a valid token")]
    InvalidToken { name: String },

    #[error("invalid content-length header: {value:?}")]
    InvalidContentLength { value: String },

    #[error("content-length mismatch, declared: {declared}, actual: {actual}")]
    ContentLengthMismatch { declared: u64, actual: u64, partial: Box<Request> },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("stream ended while decoding {state}")]
    UnexpectedEof { state: &'static str },

    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: io::Error,
    },

    #[error("invalid decoder state: {reason}")]
    InvalidState { reason: &'static str },
}

impl DecodeError {
    pub fn malformed_request_line<S: ToString>(line: S) -> Self {
        Self::MalformedRequestLine { line: line.to_string() }
    }

    pub fn malformed_version<S: ToString>(version: S) -> Self {
        Self::MalformedVersion { version: version.to_string() }
    }

    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedVersion { version: version.to_string() }
    }

    pub fn malformed_header<S: ToString>(line: S) -> Self {
        Self::MalformedHeader { line: line.to_string() }
    }

    pub fn invalid_field_spacing<S: ToString>(name: S) -> Self {
        Self::InvalidFieldSpacing { name: name.to_string() }
    }

    pub fn invalid_token<S: ToString>(name: S) -> Self {
        Self::InvalidToken { name: name.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(value: S) -> Self {
        Self::InvalidContentLength { value: value.to_string() }
    }

    pub fn content_length_mismatch(declared: u64, actual: u64, partial: Request) -> Self {
        Self::ContentLengthMismatch { declared, actual, partial: Box::new(partial) }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn unexpected_eof(state: &'static str) -> Self {
        Self::UnexpectedEof { state }
    }

    pub fn transport<E: Into<io::Error>>(e: E) -> Self {
        Self::Transport { source: e.into() }
    }

    pub fn invalid_state(reason: &'static str) -> Self {
        Self::InvalidState { reason }
    }

    /// The partially decoded request, only present on a content-length mismatch.
    pub fn partial_request(&self) -> Option<&Request> {
        match self {
            Self::ContentLengthMismatch { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
