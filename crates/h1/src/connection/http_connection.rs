use std::sync::Arc;

use futures::SinkExt;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedWrite;
use tracing::{error, info};

use crate::codec::{DecoderConfig, ResponseEncoder};
use crate::connection::decode_request_async;
use crate::handler::Handler;
use crate::protocol::{DecodeError, HttpError, Response};

/// One HTTP exchange over a connection
///
/// `HttpConnection` reads and decodes exactly one request, hands it to a
/// [`Handler`] and writes the handler's response back. Connections are not
/// reused: after the response (or an error reply) the caller drops the
/// connection.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    framed_write: FramedWrite<W, ResponseEncoder>,
    config: DecoderConfig,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, DecoderConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: DecoderConfig) -> Self {
        Self { reader, framed_write: FramedWrite::new(writer, ResponseEncoder::new()), config }
    }

    /// Decodes one request, answers it, and flushes the response.
    ///
    /// A request that fails to decode is answered with `400 Bad Request` and
    /// the decode error is returned after the reply was sent. A transport
    /// failure gets no reply, the peer is gone.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let request = match decode_request_async(&mut self.reader, &self.config).await {
            Ok(request) => request,
            Err(e) => {
                error!(cause = %e, "can't decode request");
                if !matches!(e, DecodeError::Transport { .. }) {
                    self.framed_write.send(Response::empty(StatusCode::BAD_REQUEST)).await?;
                }
                return Err(e.into());
            }
        };

        info!(method = request.method(), target = request.target(), "receive request");

        let response = handler.call(request).await;
        info!(status = response.status().as_u16(), "send response");
        self.framed_write.send(response).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::make_handler;
    use crate::protocol::Request;
    use std::io::{self, ErrorKind};
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    struct ResetReader;

    impl AsyncRead for ResetReader {
        fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::from(ErrorKind::ConnectionReset)))
        }
    }

    struct BrokenWriter;

    impl AsyncWrite for BrokenWriter {
        fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &[u8]) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::from(ErrorKind::BrokenPipe)))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::from(ErrorKind::BrokenPipe)))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    async fn hello(req: Request) -> Response {
        Response::new(StatusCode::OK, format!("{} {}", req.method(), req.target()))
    }

    #[tokio::test]
    async fn answers_one_request() {
        let reader: &[u8] = b"GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        let mut written = Vec::new();

        HttpConnection::new(reader, &mut written).process(Arc::new(make_handler(hello))).await.unwrap();

        let written = String::from_utf8(written).unwrap();
        assert!(written.starts_with("HTTP/1.1 200 OK\r\n"), "{written}");
        assert!(written.contains("content-length: 11\r\n"), "{written}");
        assert!(written.ends_with("\r\n\r\nGET /coffee"), "{written}");
    }

    #[tokio::test]
    async fn bad_request_on_decode_error() {
        let reader: &[u8] = b"/coffee HTTP/1.1\r\n\r\n";
        let mut written = Vec::new();

        let err = HttpConnection::new(reader, &mut written).process(Arc::new(make_handler(hello))).await.unwrap_err();

        assert!(matches!(err, HttpError::RequestError { source: DecodeError::MalformedRequestLine { .. } }), "{err:?}");
        let written = String::from_utf8(written).unwrap();
        assert!(written.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{written}");
        assert!(written.contains("content-length: 0\r\n"), "{written}");
    }

    #[tokio::test]
    async fn no_reply_on_transport_error() {
        let mut written = Vec::new();
        let err = HttpConnection::new(ResetReader, &mut written).process(Arc::new(make_handler(hello))).await.unwrap_err();

        match err {
            HttpError::RequestError { source: DecodeError::Transport { source } } => assert_eq!(source.kind(), ErrorKind::ConnectionReset),
            e => panic!("unexpected error {e:?}"),
        }
        assert!(written.is_empty());

        // the decode error wins even when the writer is broken
        let err = HttpConnection::new(ResetReader, BrokenWriter).process(Arc::new(make_handler(hello))).await.unwrap_err();
        assert!(matches!(err, HttpError::RequestError { source: DecodeError::Transport { .. } }), "{err:?}");
    }
}
