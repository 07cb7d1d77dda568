//! Content-type lookup by file extension.

use std::path::Path;

/// Content type for a file name, `application/octet-stream` when the
/// extension is unknown.
pub fn content_type_by_ext(file: &str) -> &'static str {
    let ext = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    lookup(&ext.to_ascii_lowercase()).unwrap_or("application/octet-stream")
}

fn lookup(ext: &str) -> Option<&'static str> {
    Some(match ext {
        "avif" => "image/avif",
        "bin" => "application/octet-stream",
        "css" => "text/css; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "gif" => "image/gif",
        "htm" | "html" => "text/html; charset=utf-8",
        "ico" | "png" => "image/png",
        "jpeg" | "jpg" => "image/jpeg",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "pdf" => "application/pdf",
        "svg" => "image/svg+xml",
        "txt" => "text/plain; charset=utf-8",
        "webp" => "image/webp",
        "xml" => "application/xml",
        "zip" => "application/zip",
        _ => return None,
    })
}
