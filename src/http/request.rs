//! Request construction and inspection helpers.

use std::net::IpAddr;

use axum::body::Body;
use axum::http::{Method, Request};

/// Build a request with the given method and URL.
pub fn new_request(method: Method, url: &str, body: Body) -> Result<Request<Body>, axum::http::Error> {
    Request::builder().method(method).uri(url).body(body)
}

/// A bodyless GET request.
pub fn get(url: &str) -> Result<Request<Body>, axum::http::Error> {
    new_request(Method::GET, url, Body::empty())
}

/// A bodyless HEAD request.
pub fn head(url: &str) -> Result<Request<Body>, axum::http::Error> {
    new_request(Method::HEAD, url, Body::empty())
}

pub fn post(url: &str, body: Body) -> Result<Request<Body>, axum::http::Error> {
    new_request(Method::POST, url, body)
}

pub fn put(url: &str, body: Body) -> Result<Request<Body>, axum::http::Error> {
    new_request(Method::PUT, url, body)
}

pub fn patch(url: &str, body: Body) -> Result<Request<Body>, axum::http::Error> {
    new_request(Method::PATCH, url, body)
}

pub fn delete(url: &str, body: Body) -> Result<Request<Body>, axum::http::Error> {
    new_request(Method::DELETE, url, body)
}

pub fn options(url: &str, body: Body) -> Result<Request<Body>, axum::http::Error> {
    new_request(Method::OPTIONS, url, body)
}

/// Authorization header value for a bearer token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Best-effort client IP from proxy headers.
///
/// Checks `Cf-Connecting-Ip`, `True-Client-IP` and `X-Real-Ip` in that
/// order, then falls back to the first `X-Forwarded-For` element.
/// `ip:port` forms parse with the port stripped.
pub fn client_ip<B>(req: &Request<B>) -> Option<IpAddr> {
    let headers = req.headers();

    let raw = ["cf-connecting-ip", "true-client-ip", "x-real-ip"]
        .iter()
        .find_map(|name| {
            headers
                .get(*name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|forwarded| forwarded.split(',').next())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })?;

    parse_ip(raw)
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    if let Ok(addr) = raw.parse() {
        return Some(addr);
    }
    let (host, _port) = raw.rsplit_once(':')?;
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .ok()
}
