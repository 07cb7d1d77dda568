//! Router composition tests: chain ordering, branch isolation and
//! freeze-at-registration.

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::IntoResponse;
use httpkit::{Error, Handler, Middleware, Router};
use tower_http::set_header::SetResponseHeaderLayer;

/// Middleware recording `label` on the request before delegating and on
/// the response afterwards.
fn tag(label: &'static str) -> Middleware {
    Middleware::new(move |next: Handler| {
        Handler::new(move |mut req: Request<Body>| {
            let next = next.clone();
            req.headers_mut()
                .append("x-pre", HeaderValue::from_static(label));
            async move {
                let mut resp = next.call(req).await;
                resp.headers_mut()
                    .append("x-post", HeaderValue::from_static(label));
                resp
            }
        })
    })
}

/// Handler echoing the request's recorded pre-processing order.
fn echo() -> Handler {
    Handler::new(|req: Request<Body>| async move {
        let pre: Vec<String> = req
            .headers()
            .get_all("x-pre")
            .iter()
            .map(|value| value.to_str().unwrap_or_default().to_owned())
            .collect();
        pre.join(",").into_response()
    })
}

async fn call(handler: &Handler, path: &str) -> (StatusCode, String, Vec<String>) {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    let resp = handler.call(req).await;

    let status = resp.status();
    let post: Vec<String> = resp
        .headers()
        .get_all("x-post")
        .iter()
        .map(|value| value.to_str().unwrap_or_default().to_owned())
        .collect();
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .unwrap();

    (status, String::from_utf8_lossy(&body).into_owned(), post)
}

#[tokio::test]
async fn chain_order() {
    let mut router = Router::new();
    router.use_middleware(tag("A"));
    router.use_middleware(tag("B"));
    router
        .group(|r| {
            r.use_middleware(tag("C"));
            r.handle_fn("/chain", move |req| echo().call(req))
        })
        .unwrap();

    let handler = router.into_handler();
    let (status, body, post) = call(&handler, "/chain").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "A,B,C");
    assert_eq!(post, vec!["C", "B", "A"]);
}

#[tokio::test]
async fn branch_isolation() {
    let mut router = Router::new();
    router
        .group(|r| {
            r.use_middleware(tag("X"));

            // Sibling created before Y exists anywhere.
            r.group(|s1| s1.handle("/s1", echo()))?;

            r.group(|s2| {
                s2.use_middleware(tag("Y"));
                s2.handle("/s2", echo())
            })?;

            // Sibling created after: still only the parent's [X].
            r.group(|s3| s3.handle("/s3", echo()))?;

            // The parent's own chain stays [X].
            r.handle("/parent", echo())
        })
        .unwrap();

    let handler = router.into_handler();

    let (_, body, _) = call(&handler, "/s1").await;
    assert_eq!(body, "X");
    let (_, body, _) = call(&handler, "/s2").await;
    assert_eq!(body, "X,Y");
    let (_, body, _) = call(&handler, "/s3").await;
    assert_eq!(body, "X");
    let (_, body, _) = call(&handler, "/parent").await;
    assert_eq!(body, "X");
}

#[tokio::test]
async fn freeze_at_registration() {
    let mut router = Router::new();
    router
        .group(|r| {
            r.use_middleware(tag("X"));
            r.handle("/h1", echo())?;
            r.use_middleware(tag("Z"));
            r.handle("/h2", echo())
        })
        .unwrap();

    let handler = router.into_handler();

    let (_, body, _) = call(&handler, "/h1").await;
    assert_eq!(body, "X");
    let (_, body, _) = call(&handler, "/h2").await;
    assert_eq!(body, "X,Z");
}

#[tokio::test]
async fn empty_chain_is_identity() {
    let mut router = Router::new();
    router.handle("/plain", echo()).unwrap();

    let handler = router.into_handler();
    let (status, body, post) = call(&handler, "/plain").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "");
    assert!(post.is_empty());
}

#[tokio::test]
async fn unmatched_path_is_404_inside_global_chain() {
    let mut router = Router::new();
    router.use_middleware(tag("G"));
    router.handle("/known", echo()).unwrap();

    let handler = router.into_handler();
    let (status, _, post) = call(&handler, "/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    // Global middleware wraps the dispatch itself, 404s included.
    assert_eq!(post, vec!["G"]);
}

#[tokio::test]
async fn conflicting_pattern_rejected() {
    let mut router = Router::new();
    router.handle("/dup", echo()).unwrap();

    match router.handle("/dup", echo()) {
        Err(Error::Pattern { pattern, .. }) => assert_eq!(pattern, "/dup"),
        other => panic!("expected pattern error, got {other:?}"),
    }
}

#[tokio::test]
async fn tower_layer_bridges_into_chain() {
    let mut router = Router::new();
    router.use_middleware(Middleware::from_layer(SetResponseHeaderLayer::overriding(
        axum::http::header::SERVER,
        HeaderValue::from_static("httpkit"),
    )));
    router.handle("/layered", echo()).unwrap();

    let handler = router.into_handler();
    let req = Request::builder()
        .uri("/layered")
        .body(Body::empty())
        .unwrap();
    let resp = handler.call(req).await;

    assert_eq!(
        resp.headers().get(axum::http::header::SERVER),
        Some(&HeaderValue::from_static("httpkit"))
    );
}
