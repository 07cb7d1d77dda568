//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig (config.rs)
//!     → validate: defaults filled, missing handler rejected
//!     → Server::new (server.rs): TLS acceptor built, state Constructed
//!     → Server::run: bind → accept loop ⇄ shutdown signal race
//!     → accepted connection → hyper (auto http1/http2) → handler
//! ```
//!
//! The remaining modules are handler-side helpers: JSON bodies
//! (json.rs), response shortcuts (response.rs), request construction
//! and client-IP extraction (request.rs).

pub mod config;
pub mod json;
pub mod request;
pub mod response;
pub mod server;
mod tls;

pub use config::{ServerConfig, TlsConfig};
pub use json::{read_json, write_json};
pub use server::Server;
