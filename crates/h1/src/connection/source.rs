//! Byte sources and the read loops that drive a [`RequestDecoder`].
//!
//! A source hands out at most `buf.len()` bytes per call together with an
//! end-of-stream flag. The loops here size `buf` from
//! [`DecoderConfig::chunk_size`], feed whatever arrived to the decoder, and
//! stop as soon as the decoder has a complete request. No read happens after
//! that.

use std::io;
use std::io::{ErrorKind, Read};

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::codec::{DecoderConfig, RequestDecoder};
use crate::protocol::{DecodeError, Request};

/// Result of a single read from a [`ByteSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Bytes written to the front of the buffer.
    pub len: usize,
    /// No byte will follow the ones returned by this call.
    pub eof: bool,
}

impl ReadOutcome {
    pub fn data(len: usize) -> Self {
        Self { len, eof: false }
    }

    pub fn eof(len: usize) -> Self {
        Self { len, eof: true }
    }
}

/// A blocking supplier of request bytes.
///
/// A read returning zero bytes without `eof` means "no progress yet" and is
/// simply retried.
pub trait ByteSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        (**self).read_chunk(buf)
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`].
///
/// `Ok(0)` is end of stream and an interrupted read is reported as an empty
/// read, so it gets retried.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        match self.inner.read(buf) {
            Ok(0) => Ok(ReadOutcome::eof(0)),
            Ok(len) => Ok(ReadOutcome::data(len)),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(ReadOutcome::data(0)),
            Err(e) => Err(e),
        }
    }
}

/// Decodes one request from `source`, blocking on each read.
///
/// # Errors
///
/// Any [`DecodeError`] from the decoder, or [`DecodeError::Transport`] when
/// the source fails.
pub fn decode_request<S: ByteSource>(mut source: S, config: &DecoderConfig) -> Result<Request, DecodeError> {
    let mut decoder = RequestDecoder::with_config(*config);
    let mut chunk = vec![0u8; config.chunk_size()];

    loop {
        let ReadOutcome { len, eof } = source.read_chunk(&mut chunk).map_err(DecodeError::transport)?;
        trace!(len, eof, state = %decoder.state(), "read chunk");

        if let Some(request) = decoder.feed(&chunk[..len])? {
            return Ok(request);
        }
        if eof {
            return decoder.finish();
        }
    }
}

/// Decodes one request from an async reader.
///
/// Same loop as [`decode_request`], with a zero-length read taken as end of
/// stream the way `AsyncRead` reports it.
///
/// # Errors
///
/// Any [`DecodeError`] from the decoder, or [`DecodeError::Transport`] when
/// the reader fails.
pub async fn decode_request_async<R>(reader: &mut R, config: &DecoderConfig) -> Result<Request, DecodeError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut decoder = RequestDecoder::with_config(*config);
    let mut chunk = vec![0u8; config.chunk_size()];

    loop {
        let len = match reader.read(&mut chunk).await {
            Ok(len) => len,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::transport(e)),
        };
        trace!(len, state = %decoder.state(), "read chunk");

        if len == 0 {
            return decoder.finish();
        }
        if let Some(request) = decoder.feed(&chunk[..len])? {
            return Ok(request);
        }
    }
}
