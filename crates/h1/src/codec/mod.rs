//! Request decoding and response encoding
//!
//! - Request handling:
//!   - [`RequestDecoder`]: incremental, sans-I/O request decoder
//!   - [`parse_request_line`]: the request-line sub-parser it uses
//!   - header lines are handled by [`Headers`](crate::protocol::Headers)
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: `tokio_util` encoder for a whole response
//!   - [`write_status_line`] and [`write_headers`] for the pieces
//!
//! # Example
//!
//! ```
//! use micro_h1::codec::{RequestDecoder, ResponseEncoder};
//! use micro_h1::protocol::Response;
//! use tokio_util::codec::Encoder;
//! use bytes::BytesMut;
//! use http::StatusCode;
//!
//! let mut decoder = RequestDecoder::new();
//! let request = decoder.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap();
//! assert!(request.is_some());
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut buffer = BytesMut::new();
//! encoder.encode(Response::new(StatusCode::OK, "hi"), &mut buffer).unwrap();
//! assert!(buffer.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

mod request_decoder;
mod request_line;
mod response_encoder;

pub use request_decoder::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_HEADER_BYTES, DecoderConfig, RequestDecoder, State};
pub use request_line::parse_request_line;
pub use response_encoder::{ResponseEncoder, write_headers, write_status_line};
