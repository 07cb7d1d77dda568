//! Response shortcuts.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::json::write_json;
use crate::error::error_response;

/// An empty 200.
pub fn ok() -> Response {
    StatusCode::OK.into_response()
}

/// A 200 with a JSON body.
pub fn ok_json<T: Serialize>(value: &T) -> Response {
    write_json(StatusCode::OK, value)
}

/// An empty 404.
pub fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

/// An empty 308.
pub fn redirect() -> Response {
    StatusCode::PERMANENT_REDIRECT.into_response()
}

/// A 400 carrying the error in the JSON envelope.
pub fn bad_request(err: impl std::fmt::Display) -> Response {
    error_response(StatusCode::BAD_REQUEST, &err.to_string(), None)
}
