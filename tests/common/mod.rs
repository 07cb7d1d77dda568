//! Shared utilities for integration tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the log subscriber for tests. Repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "httpkit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
