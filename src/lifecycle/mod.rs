//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger → signal observed by Server::run → stop accepting
//!     → drain in-flight connections under the grace period → exit
//! ```

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
