//! Response serialization: status line, header block, body.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use tokio_util::codec::Encoder;

use crate::protocol::{Headers, Response, SendError};

/// Initial buffer size reserved for the status line and headers
const INIT_HEADER_SIZE: usize = 1024;

/// Writes `HTTP/1.1 <code> <reason>\r\n`.
///
/// The reason phrase is left out for codes without a canonical one.
pub fn write_status_line(dst: &mut BytesMut, status: StatusCode) -> io::Result<()> {
    match status.canonical_reason() {
        Some(reason) => write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason),
        None => write!(FastWrite(dst), "HTTP/1.1 {}\r\n", status.as_str()),
    }
}

/// Writes every header as `name: value\r\n`, followed by the empty line that
/// ends the header block.
pub fn write_headers(dst: &mut BytesMut, headers: &Headers) {
    for (name, value) in headers.iter() {
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}

/// Encoder for a whole [`Response`], for use with `FramedWrite`.
#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE + item.body().len());
        write_status_line(dst, item.status())?;
        write_headers(dst, item.headers());
        dst.put_slice(item.body());
        Ok(())
    }
}

/// Adapts `BytesMut` to `io::Write` so `write!` can format straight into it.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
