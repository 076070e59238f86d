//! Incremental HTTP/1.1 request decoder
//!
//! [`RequestDecoder`] rebuilds a [`Request`] from bytes that arrive in chunks of
//! any size. It never assumes a chunk holds a whole line, and a chunk may just
//! as well hold the tail of one section and the head of the next.
//!
//! # State Machine
//!
//! ```text
//! RequestLine ──> Headers ──> Body ──> Done
//! ```
//!
//! No state is skipped. `Body` is entered even when no body is expected and
//! finishes immediately in that case.
//!
//! # Buffers
//!
//! The decoder owns two buffers:
//!
//! - `accumulator`: bytes of the current line or body segment not consumed yet
//! - `remainder`: bytes found after the last delimiter, carried into the next
//!   step (and possibly the next state) as the new accumulator
//!
//! # Example
//!
//! ```
//! use micro_h1::codec::RequestDecoder;
//!
//! let mut decoder = RequestDecoder::new();
//! assert!(decoder.feed(b"GET / HT").unwrap().is_none());
//!
//! let request = decoder.feed(b"TP/1.1\r\nHost: localhost\r\n\r\n").unwrap().unwrap();
//! assert_eq!(request.method(), "GET");
//! assert_eq!(request.headers().get("Host"), Some("localhost"));
//! ```

use std::fmt;
use std::mem;

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::codec::request_line::parse_request_line;
use crate::ensure;
use crate::protocol::{DecodeError, Request, RequestParts};
use crate::utils::{CRLF, find_crlf};

/// Bytes requested from the source per read.
///
/// Kept tiny so that lines and sections regularly straddle reads.
pub const DEFAULT_CHUNK_SIZE: usize = 8;

/// Maximum size in bytes allowed for the request line plus the header block.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Tunables of the decoding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    chunk_size: usize,
    max_header_bytes: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, max_header_bytes: DEFAULT_MAX_HEADER_BYTES }
    }
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many bytes a driver asks the source for per read.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }
}

/// Where the decoder currently is within the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    RequestLine,
    Headers,
    Body,
    Done,
}

impl State {
    fn as_str(self) -> &'static str {
        match self {
            State::RequestLine => "request line",
            State::Headers => "headers",
            State::Body => "body",
            State::Done => "done",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running the handler of the current state once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Progress was made, run the (possibly new) state again.
    Continue,
    /// Nothing more can be done until more bytes arrive.
    Pending,
    /// The request is complete.
    Complete,
}

/// Sans-I/O decoder for a single HTTP/1.1 request.
///
/// Feed it chunks with [`feed`](Self::feed) and call [`finish`](Self::finish)
/// once the source reports end of stream. See
/// [`decode_request`](crate::connection::decode_request) and
/// [`decode_request_async`](crate::connection::decode_request_async) for
/// drivers that read from a source.
#[derive(Debug)]
pub struct RequestDecoder {
    config: DecoderConfig,
    state: State,
    accumulator: BytesMut,
    remainder: BytesMut,
    parts: RequestParts,
    /// bytes of request line and header block consumed so far
    header_bytes: usize,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_config(DecoderConfig::default())
    }
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` with the default configuration
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            state: State::RequestLine,
            accumulator: BytesMut::new(),
            remainder: BytesMut::new(),
            parts: RequestParts::default(),
            header_bytes: 0,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Appends `chunk` and advances the state machine as far as the buffered
    /// bytes allow.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete, the decoder is done
    /// - `Ok(None)`: more bytes are needed
    /// - `Err(_)`: decoding failed, the decoder must not be used again
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<Request>, DecodeError> {
        ensure!(self.state != State::Done, DecodeError::invalid_state("feed after the request was complete"));

        self.accumulator.extend_from_slice(chunk);

        loop {
            match self.step()? {
                Step::Continue => {}
                Step::Pending => return Ok(None),
                Step::Complete => return self.complete().map(Some),
            }
        }
    }

    /// Signals end of stream.
    ///
    /// Succeeds only if the body reached exactly the declared length, which
    /// [`feed`](Self::feed) would normally already have reported.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::ContentLengthMismatch`] when the body is short, carrying
    ///   the partial request
    /// - [`DecodeError::UnexpectedEof`] when the stream ends before the header
    ///   block was terminated
    pub fn finish(&mut self) -> Result<Request, DecodeError> {
        match self.state {
            State::RequestLine | State::Headers => Err(DecodeError::unexpected_eof(self.state.as_str())),
            State::Body => {
                let declared = self.parts.content_length.unwrap_or(0);
                let actual = self.parts.body.len() as u64;
                if actual == declared {
                    self.transition(State::Done);
                    return self.complete();
                }

                debug!(declared, actual, "stream ended before the declared body length");
                let partial = mem::take(&mut self.parts).into_request()?;
                Err(DecodeError::content_length_mismatch(declared, actual, partial))
            }
            State::Done => Err(DecodeError::invalid_state("finish after the request was complete")),
        }
    }

    fn step(&mut self) -> Result<Step, DecodeError> {
        match self.state {
            State::RequestLine => self.decode_request_line(),
            State::Headers => self.decode_headers(),
            State::Body => self.decode_body(),
            State::Done => Ok(Step::Complete),
        }
    }

    fn decode_request_line(&mut self) -> Result<Step, DecodeError> {
        let Some(line) = self.split_line()? else {
            return Ok(Step::Pending);
        };

        let request_line = parse_request_line(&line)?;
        trace!(method = request_line.method(), target = request_line.target(), "parsed request line");
        self.parts.request_line = Some(request_line);

        self.transition(State::Headers);
        Ok(Step::Continue)
    }

    fn decode_headers(&mut self) -> Result<Step, DecodeError> {
        if self.accumulator.starts_with(CRLF) {
            self.remainder = self.accumulator.split_off(CRLF.len());
            self.accumulator.clear();
            self.consume_header_bytes(CRLF.len())?;
            self.transition(State::Body);
            return Ok(Step::Continue);
        }

        if find_crlf(&self.accumulator).is_none() {
            self.check_pending_header_bytes()?;
            return Ok(Step::Pending);
        }

        let (consumed, complete) = self.parts.headers.parse_block(&self.accumulator)?;
        self.consume_header_bytes(consumed)?;
        self.remainder = self.accumulator.split_off(consumed);
        self.accumulator.clear();

        if let Some(length) = self.parts.headers.content_length()? {
            self.parts.content_length = Some(length);
        }

        if complete {
            self.transition(State::Body);
        } else {
            self.reseed();
        }
        Ok(Step::Continue)
    }

    fn decode_body(&mut self) -> Result<Step, DecodeError> {
        let declared = match self.parts.content_length {
            None | Some(0) => {
                if !self.accumulator.is_empty() {
                    trace!(ignored = self.accumulator.len(), "bytes after a request without body");
                    self.accumulator.clear();
                }
                self.transition(State::Done);
                return Ok(Step::Complete);
            }
            Some(declared) => declared,
        };

        // never take more than the declared length, whatever the chunk held
        let missing = declared - self.parts.body.len() as u64;
        let take = usize::try_from(missing).map_or(self.accumulator.len(), |missing| missing.min(self.accumulator.len()));
        let segment = self.accumulator.split_to(take);
        self.parts.body.unsplit(segment);

        let actual = self.parts.body.len() as u64;
        trace!(declared, actual, "body bytes received");

        if actual < declared {
            return Ok(Step::Pending);
        }

        if !self.accumulator.is_empty() {
            trace!(ignored = self.accumulator.len(), "bytes after the declared body length");
            self.accumulator.clear();
        }
        self.transition(State::Done);
        Ok(Step::Complete)
    }

    /// Splits the accumulator at the first CRLF.
    ///
    /// Returns the line without its delimiter and leaves everything after the
    /// delimiter in `remainder`. Returns `None` when no full line is buffered.
    fn split_line(&mut self) -> Result<Option<BytesMut>, DecodeError> {
        let Some(idx) = find_crlf(&self.accumulator) else {
            self.check_pending_header_bytes()?;
            return Ok(None);
        };

        self.consume_header_bytes(idx + CRLF.len())?;
        self.remainder = self.accumulator.split_off(idx + CRLF.len());

        let mut line = self.accumulator.split();
        line.truncate(idx);
        Ok(Some(line))
    }

    /// Moves into `state`, seeding the new state's accumulator from `remainder`.
    fn transition(&mut self, state: State) {
        trace!(from = %self.state, to = %state, carried = self.remainder.len(), "decoder state transition");
        self.state = state;
        self.reseed();
    }

    fn reseed(&mut self) {
        debug_assert!(self.accumulator.is_empty(), "accumulator must be consumed before reseeding");
        self.accumulator = mem::take(&mut self.remainder);
    }

    fn consume_header_bytes(&mut self, consumed: usize) -> Result<(), DecodeError> {
        self.header_bytes += consumed;
        let max_size = self.config.max_header_bytes;
        ensure!(self.header_bytes <= max_size, DecodeError::too_large_header(self.header_bytes, max_size));
        Ok(())
    }

    fn check_pending_header_bytes(&self) -> Result<(), DecodeError> {
        let current_size = self.header_bytes + self.accumulator.len();
        let max_size = self.config.max_header_bytes;
        ensure!(current_size <= max_size, DecodeError::too_large_header(current_size, max_size));
        Ok(())
    }

    fn complete(&mut self) -> Result<Request, DecodeError> {
        ensure!(self.state == State::Done, DecodeError::invalid_state("request completed outside the done state"));

        let request = mem::take(&mut self.parts).into_request()?;
        debug!(method = request.method(), target = request.target(), body_size = request.body().len(), "decoded request");
        Ok(request)
    }
}
