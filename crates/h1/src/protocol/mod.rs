//! Data model of the decoder and its server glue.
//!
//! - **Requests** ([`request`]): [`RequestLine`] and the decoded [`Request`]
//! - **Headers** ([`headers`]): the case-insensitive [`Headers`] set, which also
//!   knows how to ingest a CRLF-delimited header block line by line
//! - **Responses** ([`response`]): [`Response`] and [`default_headers`]
//! - **Errors** ([`error`]):
//!   - [`DecodeError`]: everything that aborts decoding a request
//!   - [`SendError`]: failures while writing a response
//!   - [`HttpError`]: top-level error of a connection

mod headers;
pub use headers::CONTENT_LENGTH;
pub use headers::Headers;

mod request;
pub(crate) use request::RequestParts;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::Response;
pub use response::default_headers;

mod error;
pub use error::DecodeError;
pub use error::HttpError;
pub use error::SendError;
