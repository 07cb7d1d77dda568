//! Server configuration and validation.
//!
//! # Responsibilities
//! - Carry the listen address, handler and transport knobs
//! - Fill defaults for zero-valued fields, idempotently and in place
//! - Reject configurations that cannot serve (missing handler)
//!
//! # Design Decisions
//! - Zero means "use the default", so a zeroed struct is a valid start
//! - The missing-handler check lives here and nowhere else; by the time
//!   a `Server` exists the handler is guaranteed present

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;
use crate::routing::Handler;

pub(crate) const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_READ_HEADER_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(15);
pub(crate) const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// TLS settings for the listener: PEM-encoded certificate chain and key.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Configuration for [`Server`](super::Server).
///
/// Zero-valued duration and size fields mean "use the default";
/// [`ServerConfig::validate`] fills them in place.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Address to listen on, e.g. `"127.0.0.1:8080"`.
    pub addr: String,

    /// Dispatch entry point for every request.
    pub handler: Option<Handler>,

    /// Disable HTTP/2 negotiation; the listener then speaks HTTP/1.1
    /// only and drops `h2` from the TLS ALPN list.
    pub no_http2: bool,

    /// Serve TLS when set.
    pub tls: Option<TlsConfig>,

    /// Budget for reading and answering a single request.
    pub read_timeout: Duration,

    /// Budget for reading a request's header section.
    pub read_header_timeout: Duration,

    /// Budget for writing a response, carried for callers wiring
    /// per-route budgets.
    pub write_timeout: Duration,

    /// How long a keep-alive connection may sit idle.
    pub idle_timeout: Duration,

    /// Cap on a request's header section, in bytes.
    pub max_header_bytes: usize,
}

impl ServerConfig {
    /// Fill defaults for zero-valued fields and check required ones.
    ///
    /// Idempotent: validating an already validated config changes
    /// nothing. Returns [`Error::Config`] when no handler is set.
    pub fn validate(&mut self) -> Result<(), Error> {
        if self.handler.is_none() {
            return Err(Error::Config("no handler configured".to_owned()));
        }

        if self.read_timeout.is_zero() {
            self.read_timeout = DEFAULT_READ_TIMEOUT;
        }
        if self.read_header_timeout.is_zero() {
            self.read_header_timeout = DEFAULT_READ_HEADER_TIMEOUT;
        }
        if self.write_timeout.is_zero() {
            self.write_timeout = DEFAULT_WRITE_TIMEOUT;
        }
        if self.idle_timeout.is_zero() {
            self.idle_timeout = DEFAULT_IDLE_TIMEOUT;
        }
        if self.max_header_bytes == 0 {
            self.max_header_bytes = DEFAULT_MAX_HEADER_BYTES;
        }
        Ok(())
    }
}
