//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     use_middleware → global or route chain (by router scope)
//!     group → subrouter with a copy of the route chain
//!     handle → route chain composed around handler, frozen, inserted
//!
//! Dispatch:
//!     request → global chain → pattern table lookup → composed handler
//! ```

pub mod middleware;
pub mod router;

pub use middleware::{Handler, HandlerFuture, Middleware, MiddlewareChain};
pub use router::Router;
