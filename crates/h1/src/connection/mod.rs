//! I/O around the decoder
//!
//! - [`ByteSource`]: the blocking `read(buffer) -> (len, eof)` contract, with
//!   [`IoSource`] adapting any `std::io::Read`
//! - [`decode_request`] and [`decode_request_async`]: read loops feeding a
//!   [`RequestDecoder`](crate::codec::RequestDecoder) one bounded chunk at a time
//! - [`HttpConnection`]: decodes one request from a connection, calls the
//!   handler and writes the response

mod http_connection;
mod source;

pub use http_connection::HttpConnection;
pub use source::{ByteSource, IoSource, ReadOutcome, decode_request, decode_request_async};
