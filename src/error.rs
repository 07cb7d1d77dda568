//! Error taxonomy and the JSON error envelope.
//!
//! # Responsibilities
//! - Define the crate-level error kinds surfaced to callers
//! - Carry a request error's status code and message as an explicit tag
//! - Format the JSON error envelope written to clients
//!
//! # Design Decisions
//! - Configuration errors are detected at construction, never at runtime
//! - Runtime errors come out of `Server::run` and are never retried here;
//!   retries, if desired, belong to the caller
//! - Response formatting branches on the `HttpError` tag, not on dynamic
//!   type inspection of error values

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Errors surfaced by the toolkit.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid configuration, rejected before the server can run.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The listening address could not be acquired.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// The accept loop failed.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),

    /// In-flight connections did not drain within the grace period.
    /// The listener is closed regardless.
    #[error("graceful shutdown timed out, remaining connections severed")]
    ShutdownTimeout,

    /// The pattern multiplexer rejected a route registration.
    #[error("invalid route pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: matchit::InsertError,
    },
}

/// A request-scoped error carrying its own response status.
///
/// Handlers and body helpers return this so the formatting boundary can
/// branch on the tag and write the JSON envelope.
#[derive(Debug, Clone, ThisError)]
#[error("{message}")]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    /// Optional machine-readable error category, the envelope's `type`.
    pub kind: Option<String>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        error_response(self.status, &self.message, self.kind.as_deref())
    }
}

/// The JSON envelope for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    #[serde(skip_serializing_if = "code_is_zero")]
    code: u16,
    #[serde(skip_serializing_if = "str::is_empty")]
    error: &'a str,
    #[serde(rename = "type", skip_serializing_if = "str::is_empty")]
    kind: &'a str,
}

fn code_is_zero(code: &u16) -> bool {
    *code == 0
}

/// Write an error wrapped into the JSON envelope.
pub fn error_response(status: StatusCode, message: &str, kind: Option<&str>) -> Response {
    let body = ErrorBody {
        code: status.as_u16(),
        error: message,
        kind: kind.unwrap_or_default(),
    };

    match serde_json::to_vec_pretty(&body) {
        Ok(raw) => (
            status,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            Body::from(raw),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "JSON marshal failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
