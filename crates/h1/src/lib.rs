//! An incremental HTTP/1.1 request decoder
//!
//! This crate rebuilds HTTP/1.1 requests from byte streams that deliver data
//! in arbitrarily small pieces. A read may stop in the middle of a line, and a
//! single read may hold the end of the header block together with the start of
//! the body; the decoder handles both without ever asking the transport for a
//! full line or a full message.
//!
//! Around the decoder sits a deliberately thin server: a tokio accept loop,
//! one task per connection, one request per connection, and a response writer.
//!
//! # Example
//!
//! ```
//! use micro_h1::codec::DecoderConfig;
//! use micro_h1::connection::{IoSource, decode_request};
//!
//! let raw = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n";
//!
//! // read three bytes at a time, the decoder does not care
//! let config = DecoderConfig::new().with_chunk_size(3);
//! let request = decode_request(IoSource::new(&raw[..]), &config).unwrap();
//!
//! assert_eq!(request.method(), "POST");
//! assert_eq!(request.target(), "/submit");
//! assert_eq!(request.version(), "1.1");
//! assert_eq!(request.headers().get("HOST"), Some("localhost:42069"));
//! assert_eq!(&request.body()[..], b"hello world!\n");
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: the [`RequestDecoder`](codec::RequestDecoder) state machine,
//!   the request-line parser and the response encoder
//! - [`protocol`]: request, header set, response and error types
//! - [`connection`]: byte sources, read loops and [`HttpConnection`](connection::HttpConnection)
//! - [`handler`]: the [`Handler`](handler::Handler) trait and [`make_handler`](handler::make_handler)
//! - [`server`]: [`Server`](server::Server), the accept loop
//!
//! # Decoding
//!
//! The decoder walks through `RequestLine → Headers → Body → Done`. It keeps an
//! accumulator for the bytes of the current line and a remainder for bytes
//! read past the last delimiter, which become the accumulator of the next
//! step. Bodies are read by `Content-Length` only; a request without that
//! header has an empty body and completes as soon as the header block ends.
//!
//! ## Error Handling
//!
//! - [`protocol::DecodeError`]: anything that aborts decoding a request
//! - [`protocol::SendError`]: response sending errors
//! - [`protocol::HttpError`]: top-level error of a connection
//!
//! # Limitations
//!
//! - HTTP/1.1 only
//! - No chunked transfer encoding, no pipelining, no keep-alive
//! - No TLS support (use a reverse proxy for HTTPS)
//! - Maximum header size: 8KB by default

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
