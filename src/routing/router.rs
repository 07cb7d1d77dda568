//! Request router with ordered middleware composition.
//!
//! # Responsibilities
//! - Register path patterns against fully composed handlers
//! - Apply route-scoped middleware, frozen at registration time
//! - Apply global middleware uniformly around pattern-table dispatch
//! - Branch into subrouters with copy-on-branch middleware lists
//!
//! # Design Decisions
//! - Pattern syntax and match precedence belong to the multiplexer
//!   (matchit); the router only guarantees the composed chain
//! - Subrouters share the pattern table but receive a copy of the route
//!   chain at branch time, so sibling branches never observe each
//!   other's later `use_middleware` calls
//! - A handler's chain is fixed when `handle` runs; later
//!   `use_middleware` calls affect only subsequent registrations

use std::sync::{Arc, PoisonError, RwLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;

use super::middleware::{Handler, Middleware, MiddlewareChain};
use crate::error::Error;

type PatternTable = Arc<RwLock<matchit::Router<Handler>>>;

/// Router composing two middleware layers around a shared pattern table.
pub struct Router {
    table: PatternTable,
    global: MiddlewareChain,
    scoped: MiddlewareChain,
    is_subrouter: bool,
}

impl Router {
    /// An empty top-level router.
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(matchit::Router::new())),
            global: MiddlewareChain::new(),
            scoped: MiddlewareChain::new(),
            is_subrouter: false,
        }
    }

    /// Append a middleware.
    ///
    /// On the top-level router this extends the global chain wrapped
    /// around every dispatch; inside a group it extends the route chain
    /// applied to handlers registered through that group.
    pub fn use_middleware(&mut self, mw: Middleware) {
        if self.is_subrouter {
            self.scoped.push(mw);
        } else {
            self.global.push(mw);
        }
    }

    /// Create a subrouter registering into the same pattern namespace.
    ///
    /// The subrouter starts with a copy of the caller's current route
    /// chain; neither side sees the other's later additions. Groups
    /// nest, compounding the copied chain. `f` is invoked synchronously,
    /// once.
    pub fn group<T>(&mut self, f: impl FnOnce(&mut Router) -> T) -> T {
        let mut sub = Router {
            table: Arc::clone(&self.table),
            global: MiddlewareChain::new(),
            scoped: self.scoped.clone(),
            is_subrouter: true,
        };
        f(&mut sub)
    }

    /// Register `handler` under `pattern`, wrapped in the current route
    /// chain. The chain is frozen here; the first-registered route
    /// middleware runs first on an incoming request.
    pub fn handle(&mut self, pattern: &str, handler: Handler) -> Result<(), Error> {
        let composed = self.scoped.wrap(handler);
        self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern, composed)
            .map_err(|source| Error::Pattern {
                pattern: pattern.to_owned(),
                source,
            })
    }

    /// [`Router::handle`] for a plain async function.
    pub fn handle_fn<F, Fut>(&mut self, pattern: &str, f: F) -> Result<(), Error>
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = axum::response::Response> + Send + 'static,
    {
        self.handle(pattern, Handler::new(f))
    }

    /// Freeze the router into a servable handler.
    ///
    /// The global chain wraps the pattern-table dispatch, so it applies
    /// to every route uniformly no matter which subrouter declared it.
    /// Unmatched paths get a plain 404 from inside the chain.
    pub fn into_handler(self) -> Handler {
        let Router { table, global, .. } = self;

        let dispatch = Handler::new(move |req: Request<Body>| {
            let matched = table
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .at(req.uri().path())
                .map(|m| m.value.clone())
                .ok();

            async move {
                match matched {
                    Some(handler) => handler.call(req).await,
                    None => StatusCode::NOT_FOUND.into_response(),
                }
            }
        });

        global.wrap(dispatch)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("global", &self.global)
            .field("scoped", &self.scoped)
            .field("is_subrouter", &self.is_subrouter)
            .finish()
    }
}
