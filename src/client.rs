//! Outbound HTTP client construction.
//!
//! Handlers that call other services share one pooled client; this
//! factory applies the toolkit's pooling defaults.

use std::time::Duration;

use axum::body::Body;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

/// How long an idle pooled connection is kept around.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Idle connections kept per host.
const POOL_MAX_IDLE_PER_HOST: usize = 32;

/// A pooled HTTP client with the toolkit's defaults.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build a pooled client.
pub fn pooled_client() -> HttpClient {
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .build(HttpConnector::new())
}
