//! Accept-Language header parsing.

use axum::http::{header, Request};

/// A language tag with its quality factor from the `Accept-Language`
/// header.
#[derive(Debug, Clone, PartialEq)]
pub struct LangQ {
    /// The language tag, lowercased (e.g. `"en"`, `"fr"`, `"en-us"`).
    pub lang: String,
    /// The quality factor, clamped to `[0, 1]`.
    pub q: f64,
}

/// Highest-preference language from `Accept-Language`.
///
/// Defaults to `"en"` when the header is missing or empty.
pub fn accept_language<B>(req: &Request<B>) -> String {
    accept_languages(req)
        .into_iter()
        .next()
        .map(|lq| lq.lang)
        .unwrap_or_else(|| "en".to_owned())
}

/// All languages from `Accept-Language`, stable-sorted by descending
/// quality factor. Returns `[{"en", 1}]` when nothing valid is found.
pub fn accept_languages<B>(req: &Request<B>) -> Vec<LangQ> {
    let value = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    parse_accept_language(value)
}

fn parse_accept_language(value: &str) -> Vec<LangQ> {
    if value.is_empty() {
        return vec![LangQ {
            lang: "en".to_owned(),
            q: 1.0,
        }];
    }

    let mut langs = Vec::new();
    for part in value.split(',') {
        let part = part.trim().to_ascii_lowercase();
        let mut pieces = part.split(';');

        let lang = pieces.next().unwrap_or_default().trim();
        let lang = if lang.is_empty() { "en" } else { lang };

        // Only the first parameter is read; default q=1 when it is
        // absent or fails to parse.
        let q = match pieces.next() {
            None => 1.0,
            Some(param) => param
                .splitn(2, '=')
                .nth(1)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .map(|q| q.clamp(0.0, 1.0))
                .unwrap_or(1.0),
        };

        langs.push(LangQ {
            lang: lang.to_owned(),
            q,
        });
    }

    // Vec::sort_by is stable, so equal q keeps header order.
    langs.sort_by(|a, b| b.q.partial_cmp(&a.q).unwrap_or(std::cmp::Ordering::Equal));
    langs
}
