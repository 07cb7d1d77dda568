//! Handler and middleware primitives.
//!
//! # Responsibilities
//! - Type-erase async request handlers behind a cheaply clonable value
//! - Represent middleware as handler-to-handler transformations
//! - Compose ordered chains: first registered is the outermost wrapper
//!
//! # Design Decisions
//! - Composition is purely functional over handler values; chains carry
//!   no request state and never observe the pattern table
//! - `Handler` implements `tower::Service` so a composed router plugs
//!   into the connection layer without an adapter

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tower::util::Oneshot;
use tower::{Layer, Service, ServiceExt};

/// Boxed future produced by a [`Handler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A type-erased async request handler: consumes one request, produces
/// one response. Cloning is cheap and shares the underlying function.
#[derive(Clone)]
pub struct Handler {
    f: Arc<dyn Fn(Request<Body>) -> HandlerFuture + Send + Sync>,
}

impl Handler {
    /// Wrap an async function as a handler.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            f: Arc::new(move |req| Box::pin(f(req))),
        }
    }

    /// Invoke the handler.
    pub fn call(&self, req: Request<Body>) -> HandlerFuture {
        (self.f)(req)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler")
    }
}

impl Service<Request<Body>> for Handler {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let fut = (self.f)(req);
        Box::pin(async move { Ok(fut.await) })
    }
}

/// A transformation from one handler into another.
///
/// A middleware may short-circuit without delegating, or observe and
/// mutate the request and response around the inner handler. That is
/// normal control flow, not a fault; the router never inspects it.
#[derive(Clone)]
pub struct Middleware {
    f: Arc<dyn Fn(Handler) -> Handler + Send + Sync>,
}

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Wrap `next` in this middleware.
    pub fn wrap(&self, next: Handler) -> Handler {
        (self.f)(next)
    }

    /// Bridge a tower layer into the middleware model.
    ///
    /// The layer is applied to the inner handler once per wrap; the
    /// resulting service is driven per request via `oneshot`.
    pub fn from_layer<L, S>(layer: L) -> Self
    where
        L: Layer<Handler, Service = S> + Send + Sync + 'static,
        S: Service<Request<Body>, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        Self::new(move |next| {
            let svc = layer.layer(next);
            Handler::new(move |req| {
                let call: Oneshot<S, Request<Body>> = svc.clone().oneshot(req);
                async move {
                    match call.await {
                        Ok(response) => response,
                        Err(never) => match never {},
                    }
                }
            })
        })
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Middleware")
    }
}

/// An ordered middleware sequence.
///
/// The first middleware pushed becomes the outermost wrapper: it runs
/// first on the way in and last on the way out. An empty chain composes
/// to the identity.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Middleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware to the end of the chain.
    pub fn push(&mut self, mw: Middleware) {
        self.layers.push(mw);
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Wrap `handler` in every layer, last pushed innermost.
    pub fn wrap(&self, handler: Handler) -> Handler {
        self.layers.iter().rev().fold(handler, |h, mw| mw.wrap(h))
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("len", &self.layers.len())
            .finish()
    }
}
