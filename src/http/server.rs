//! HTTP server lifecycle.
//!
//! # Responsibilities
//! - Validate configuration and construct the server
//! - Bind the listener and run the accept loop
//! - Race the accept loop against external cancellation
//! - Drain in-flight connections under a fixed grace period
//!
//! # Design Decisions
//! - Bind errors surface before any shutdown state is reachable
//! - First event wins the race; the losing event is never acted upon
//! - The grace period is a constant, not derived from configured
//!   timeouts; connections still open when it elapses are severed

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::{GracefulShutdown, Watcher};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_rustls::TlsAcceptor;

use super::config::{ServerConfig, DEFAULT_MAX_HEADER_BYTES};
use super::tls;
use crate::error::Error;
use crate::lifecycle::ShutdownSignal;
use crate::routing::Handler;

/// How long in-flight connections may drain after cancellation before
/// the remaining ones are severed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// HTTP server wrapping one listening socket.
///
/// Single use: [`Server::run`] consumes the server and a stopped server
/// is not restarted.
pub struct Server {
    config: ServerConfig,
    handler: Handler,
    acceptor: Option<TlsAcceptor>,
    addr_tx: Option<oneshot::Sender<SocketAddr>>,
}

impl Server {
    /// Validate `config`, fill its defaults and construct the server.
    ///
    /// Returns [`Error::Config`] when no handler is set or the TLS
    /// files cannot be loaded. No partial construction is observable on
    /// failure.
    pub fn new(mut config: ServerConfig) -> Result<Self, Error> {
        config.validate()?;

        // validate() has already rejected a missing handler.
        let handler = config
            .handler
            .take()
            .ok_or_else(|| Error::Config("no handler configured".to_owned()))?;

        let acceptor = match &config.tls {
            Some(tls_config) => Some(tls::build_acceptor(tls_config, config.no_http2)?),
            None => None,
        };

        Ok(Self {
            config,
            handler,
            acceptor,
            addr_tx: None,
        })
    }

    /// Receiver resolving to the listener's local address once
    /// [`Server::run`] has bound it.
    ///
    /// Useful with an `addr` ending in `:0`, where the kernel picks the
    /// port. The receiver errors instead when binding fails.
    pub fn bound_addr(&mut self) -> oneshot::Receiver<SocketAddr> {
        let (tx, rx) = oneshot::channel();
        self.addr_tx = Some(tx);
        rx
    }

    /// Replace the handler, then run. Same semantics as [`Server::run`].
    pub async fn start(mut self, shutdown: ShutdownSignal, handler: Handler) -> Result<(), Error> {
        self.handler = handler;
        self.run(shutdown).await
    }

    /// Bind the configured address and serve until the accept loop dies
    /// or `shutdown` fires, whichever is observed first.
    ///
    /// A bind or accept failure is returned immediately and no shutdown
    /// sequence runs. On cancellation the listener closes and in-flight
    /// connections get a fixed grace period to finish; if any are still
    /// open after it elapses they are dropped and
    /// [`Error::ShutdownTimeout`] is returned.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> Result<(), Error> {
        let listener = TcpListener::bind(&self.config.addr)
            .await
            .map_err(Error::Bind)?;
        let addr = listener.local_addr().map_err(Error::Bind)?;
        if let Some(tx) = self.addr_tx.take() {
            let _ = tx.send(addr);
        }

        let scheme = if self.acceptor.is_some() { "https" } else { "http" };
        tracing::info!(address = %addr, scheme, "HTTP server starting");

        let builder = self.connection_builder();
        let graceful = GracefulShutdown::new();

        let result = loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        self.spawn_connection(stream, peer, &builder, &graceful);
                    }
                    Err(err) => break Err(Error::Accept(err)),
                },
                _ = shutdown.cancelled() => break Ok(()),
            }
        };

        // An accept-loop failure returns as is; the listener is already
        // dead and no drain runs.
        result?;

        tracing::info!("shutdown signal received, draining connections");
        drop(listener);

        tokio::select! {
            _ = graceful.shutdown() => {
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            _ = tokio::time::sleep(SHUTDOWN_GRACE) => {
                tracing::warn!(
                    grace = ?SHUTDOWN_GRACE,
                    "grace period elapsed, severing remaining connections"
                );
                Err(Error::ShutdownTimeout)
            }
        }
    }

    /// Connection builder carrying the configured transport budgets.
    fn connection_builder(&self) -> auto::Builder<TokioExecutor> {
        let mut builder = auto::Builder::new(TokioExecutor::new());
        if self.config.no_http2 {
            builder = builder.http1_only();
        }
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.read_header_timeout)
            // hyper's http1 read buffer has an 8 KiB floor
            .max_buf_size(self.config.max_header_bytes.max(DEFAULT_MAX_HEADER_BYTES));
        builder
            .http2()
            .timer(TokioTimer::new())
            .keep_alive_interval(self.config.idle_timeout);
        builder
    }

    /// Serve one accepted connection on its own task, watched for
    /// graceful drain.
    fn spawn_connection(
        &self,
        stream: TcpStream,
        peer: SocketAddr,
        builder: &auto::Builder<TokioExecutor>,
        graceful: &GracefulShutdown,
    ) {
        tracing::debug!(peer_addr = %peer, "connection accepted");

        let handler = self.handler.clone();
        let read_timeout = self.config.read_timeout;
        let service = service_fn(move |req: Request<Incoming>| {
            let handler = handler.clone();
            async move {
                let req = req.map(Body::new);
                let response = match tokio::time::timeout(read_timeout, handler.call(req)).await {
                    Ok(response) => response,
                    Err(_) => StatusCode::REQUEST_TIMEOUT.into_response(),
                };
                Ok::<_, Infallible>(response)
            }
        });

        let builder = builder.clone();
        let watcher = graceful.watcher();
        let acceptor = self.acceptor.clone();

        tokio::spawn(async move {
            match acceptor {
                Some(acceptor) => match acceptor.accept(stream).await {
                    Ok(stream) => serve_stream(stream, builder, watcher, service, peer).await,
                    Err(err) => {
                        tracing::debug!(peer_addr = %peer, error = %err, "TLS handshake failed");
                    }
                },
                None => serve_stream(stream, builder, watcher, service, peer).await,
            }
        });
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("addr", &self.config.addr)
            .field("tls", &self.acceptor.is_some())
            .finish()
    }
}

async fn serve_stream<I, S>(
    stream: I,
    builder: auto::Builder<TokioExecutor>,
    watcher: Watcher,
    service: S,
    peer: SocketAddr,
) where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    S: hyper::service::Service<Request<Incoming>, Response = Response, Error = Infallible>
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    let conn = builder
        .serve_connection_with_upgrades(TokioIo::new(stream), service)
        .into_owned();

    if let Err(err) = watcher.watch(conn).await {
        tracing::debug!(peer_addr = %peer, error = %err, "connection closed with error");
    }
}
