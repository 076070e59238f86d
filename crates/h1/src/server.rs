//! TCP front end: accept loop and per-connection tasks.
//!
//! Every accepted connection is served on its own tokio task by an
//! [`HttpConnection`]. Connections share nothing but the handler.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::codec::DecoderConfig;
use crate::connection::HttpConnection;
use crate::handler::Handler;

pub const DEFAULT_PORT: u16 = 42069;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    addr: SocketAddr,
    decoder: DecoderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)), decoder: DecoderConfig::default() }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn decoder(&self) -> &DecoderConfig {
        &self.decoder
    }
}

/// A running server.
///
/// Dropping it leaves the accept loop running; call [`Server::close`] to stop
/// accepting.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_loop: JoinHandle<()>,
}

impl Server {
    /// Binds the listener and starts accepting in the background.
    ///
    /// # Errors
    ///
    /// Returns the bind error when the address can't be listened on.
    pub async fn bind<H>(config: ServerConfig, handler: H) -> io::Result<Self>
    where
        H: Handler + Sync + 'static,
    {
        let listener = match TcpListener::bind(config.addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(cause = %e, addr = %config.addr, "bind server error");
                return Err(e);
            }
        };
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "start listening");

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let accept_loop = tokio::spawn(accept_loop(listener, Arc::new(handler), config.decoder, Arc::clone(&closed), Arc::clone(&shutdown)));

        Ok(Self { local_addr, closed, shutdown, accept_loop })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting new connections and waits for the accept loop to end.
    ///
    /// Connections already being served keep running on their own tasks.
    pub async fn close(self) {
        self.closed.store(true, Ordering::Release);
        self.shutdown.notify_one();
        if let Err(e) = self.accept_loop.await {
            warn!(cause = %e, "accept loop ended abnormally");
        }
        info!(addr = %self.local_addr, "server closed");
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, config: DecoderConfig, closed: Arc<AtomicBool>, shutdown: Arc<Notify>)
where
    H: Handler + Sync + 'static,
{
    while !closed.load(Ordering::Acquire) {
        let (tcp_stream, remote_addr) = select! {
            () = shutdown.notified() => break,
            accepted = listener.accept() => match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
        };

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_config(reader, writer, config);
            match connection.process(handler).await {
                Ok(()) => info!(remote = %remote_addr, "finished process, connection shutdown"),
                Err(e) => error!(remote = %remote_addr, cause = %e, "service has error, connection shutdown"),
            }
        });
    }
}
