//! Helper tests: Accept-Language parsing, client IP extraction,
//! content types and response shortcuts.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpkit::content::content_type_by_ext;
use httpkit::http::request::{bearer, client_ip};
use httpkit::http::response;
use httpkit::lang::{accept_language, accept_languages, LangQ};

fn request_with_header(name: &str, value: &str) -> Request<Body> {
    Request::builder()
        .header(name, value)
        .body(Body::empty())
        .unwrap()
}

fn lq(lang: &str, q: f64) -> LangQ {
    LangQ {
        lang: lang.to_owned(),
        q,
    }
}

#[test]
fn accept_language_parsing() {
    let cases: Vec<(&str, &str, &str, Vec<LangQ>)> = vec![
        ("empty header defaults to en", "", "en", vec![lq("en", 1.0)]),
        ("single language no q-value", "what", "what", vec![lq("what", 1.0)]),
        ("simple language code", "uk", "uk", vec![lq("uk", 1.0)]),
        (
            "multiple languages with q-values",
            "en,en-GB;q=0.9,en-US;q=0.8",
            "en",
            vec![lq("en", 1.0), lq("en-gb", 0.9), lq("en-us", 0.8)],
        ),
        (
            "q-values with descending priority",
            "fr;q=0.2,es;q=0.9,de;q=0.5",
            "es",
            vec![lq("es", 0.9), lq("de", 0.5), lq("fr", 0.2)],
        ),
        (
            "malformed q-value falls back to 1",
            "jp;q=oops,cn;q=",
            "jp",
            vec![lq("jp", 1.0), lq("cn", 1.0)],
        ),
        (
            "trims spaces correctly",
            " en ; q=0.5 , fr ",
            "fr",
            vec![lq("fr", 1.0), lq("en", 0.5)],
        ),
        (
            "invalid lang name still accepted",
            "123-xyz;q=0.7",
            "123-xyz",
            vec![lq("123-xyz", 0.7)],
        ),
        (
            "parameters after the q-value are ignored",
            "en;q=0.5;v=b,fr;q=0.9",
            "fr",
            vec![lq("fr", 0.9), lq("en", 0.5)],
        ),
    ];

    for (name, header, want_lang, want_langs) in cases {
        let req = if header.is_empty() {
            Request::builder().body(Body::empty()).unwrap()
        } else {
            request_with_header("accept-language", header)
        };

        assert_eq!(accept_language(&req), want_lang, "{name}");
        assert_eq!(accept_languages(&req), want_langs, "{name}");
    }
}

#[test]
fn accept_language_q_stays_in_range() {
    for header in ["q;q=1.5", "xx;q=-3", "abc-123;q=0.0001", "zh;q=,ru;q=0.8"] {
        let req = request_with_header("accept-language", header);
        for lang in accept_languages(&req) {
            assert!(
                (0.0..=1.0).contains(&lang.q),
                "q={} out of range for {header:?}",
                lang.q
            );
            assert!(!lang.lang.is_empty(), "empty lang for {header:?}");
        }
    }
}

#[test]
fn client_ip_header_precedence() {
    let req = Request::builder()
        .header("x-real-ip", "10.0.0.2")
        .header("cf-connecting-ip", "10.0.0.1")
        .body(Body::empty())
        .unwrap();
    assert_eq!(client_ip(&req), Some("10.0.0.1".parse().unwrap()));

    let req = request_with_header("x-real-ip", "10.0.0.2");
    assert_eq!(client_ip(&req), Some("10.0.0.2".parse().unwrap()));
}

#[test]
fn client_ip_falls_back_to_forwarded_for() {
    let req = request_with_header("x-forwarded-for", "203.0.113.7, 10.0.0.1");
    assert_eq!(client_ip(&req), Some("203.0.113.7".parse().unwrap()));
}

#[test]
fn client_ip_strips_ports() {
    let req = request_with_header("x-real-ip", "203.0.113.7:4711");
    assert_eq!(client_ip(&req), Some("203.0.113.7".parse().unwrap()));

    let req = request_with_header("x-real-ip", "[2001:db8::1]:443");
    assert_eq!(client_ip(&req), Some("2001:db8::1".parse().unwrap()));
}

#[test]
fn client_ip_absent() {
    let req = Request::builder().body(Body::empty()).unwrap();
    assert_eq!(client_ip(&req), None);

    let req = request_with_header("x-real-ip", "not-an-ip");
    assert_eq!(client_ip(&req), None);
}

#[test]
fn bearer_formats_the_header() {
    assert_eq!(bearer("t0ken"), "Bearer t0ken");
}

#[test]
fn content_type_lookup() {
    assert_eq!(content_type_by_ext("index.html"), "text/html; charset=utf-8");
    assert_eq!(content_type_by_ext("photo.JPG"), "image/jpeg");
    assert_eq!(content_type_by_ext("data.json"), "application/json; charset=utf-8");
    assert_eq!(content_type_by_ext("archive.zip"), "application/zip");
    assert_eq!(content_type_by_ext("mystery.xyz"), "application/octet-stream");
    assert_eq!(content_type_by_ext("no-extension"), "application/octet-stream");
}

#[test]
fn response_shortcuts() {
    assert_eq!(response::ok().status(), StatusCode::OK);
    assert_eq!(response::not_found().status(), StatusCode::NOT_FOUND);
    assert_eq!(response::redirect().status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response::bad_request("bad input").status(),
        StatusCode::BAD_REQUEST
    );
}
