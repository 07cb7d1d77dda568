//! Small HTTP serving toolkit.
//!
//! Pairs a middleware-composing request [`Router`] with a [`Server`] that
//! owns a listening socket's lifecycle: validated configuration, a
//! concurrent accept loop and coordinated graceful shutdown driven by an
//! external [`Shutdown`] signal. The surrounding helpers (JSON bodies,
//! response shortcuts, Accept-Language parsing, content types) are plain
//! data transformations handlers can reach for.

pub mod client;
pub mod content;
pub mod error;
pub mod http;
pub mod lang;
pub mod lifecycle;
pub mod routing;

pub use error::{Error, HttpError};
pub use http::{Server, ServerConfig, TlsConfig};
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use routing::{Handler, Middleware, MiddlewareChain, Router};
