//! JSON request and response bodies.
//!
//! # Responsibilities
//! - Decode JSON request bodies with a hard size cap
//! - Classify decode failures into client-meaningful statuses
//! - Serialize response bodies with a plain fallback on failure

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HttpError;

/// Largest request body accepted by [`read_json`].
const MAX_BODY_BYTES: usize = 4096;

/// Decode a JSON request body with well defined error handling.
///
/// Rejects non-JSON content types (415), bodies over [`MAX_BODY_BYTES`]
/// (413), and malformed, empty or trailing-data payloads (400). The
/// returned [`HttpError`] renders straight into the error envelope.
pub async fn read_json<T: DeserializeOwned>(req: Request<Body>) -> Result<T, HttpError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with("application/json") {
        return Err(HttpError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Content-Type header is not application/json: {content_type}"),
        ));
    }

    let bytes = match Limited::new(req.into_body(), MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(HttpError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body too large",
            ));
        }
        Err(_) => {
            return Err(HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read request body",
            ));
        }
    };

    if bytes.is_empty() {
        return Err(HttpError::new(
            StatusCode::BAD_REQUEST,
            "body must not be empty",
        ));
    }

    let mut de = serde_json::Deserializer::from_slice(&bytes);
    let value = T::deserialize(&mut de).map_err(classify)?;
    if de.end().is_err() {
        return Err(HttpError::new(
            StatusCode::BAD_REQUEST,
            "body must contain only one JSON object",
        ));
    }
    Ok(value)
}

fn classify(err: serde_json::Error) -> HttpError {
    use serde_json::error::Category;

    match err.classify() {
        Category::Syntax => HttpError::new(
            StatusCode::BAD_REQUEST,
            format!("malformed json at line {} column {}", err.line(), err.column()),
        ),
        Category::Eof => HttpError::new(StatusCode::BAD_REQUEST, "malformed json"),
        Category::Data => HttpError::new(StatusCode::BAD_REQUEST, format!("invalid value: {err}")),
        Category::Io => HttpError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to decode json: {err}"),
        ),
    }
}

/// Serialize `value` as a JSON response, with a plain error body when
/// serialization itself fails.
pub fn write_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(raw) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(raw),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "application/json")],
            serde_json::json!({ "error": err.to_string() }).to_string(),
        )
            .into_response(),
    }
}
