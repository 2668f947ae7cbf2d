//! HTTP response handlers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::embed;

const HTML: &str = "text/html; charset=utf-8";
const PLAIN: &str = "text/plain; charset=utf-8";
const JAVASCRIPT: &str = "text/javascript; charset=utf-8";

/// Handle a single HTTP request against the presentation folder.
pub fn handle_request(request: Request, root: &Path, ws_port: u16) -> Result<()> {
    if crate::core::is_shutdown() {
        return respond_unavailable(request);
    }

    let url_path = request.url().split(['?', '#']).next().unwrap_or("");
    if url_path == embed::LIVERELOAD_JS_URL {
        return respond_livereload_js(request, ws_port);
    }

    match resolve_path(request.url(), root) {
        Some(path) => respond_file(request, &path),
        None => respond_not_found(request),
    }
}

/// Respond with a static file, injecting the refresh script into HTML.
fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime_for(path);
    let mut body =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if content_type == HTML {
        body = inject_livereload(&body);
    }
    send_body(request, 200, content_type, body)
}

fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with the refresh client from memory.
fn respond_livereload_js(request: Request, ws_port: u16) -> Result<()> {
    let body = embed::livereload_js(ws_port);
    send_body(request, 200, JAVASCRIPT, body.into_bytes())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(
            Header::from_bytes("Content-Type", content_type)
                .expect("static content type header"),
        );
    request.respond(response)?;
    Ok(())
}

/// Resolve URL to filesystem path, handling index.html for directories.
fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = url.split(['?', '#']).next().unwrap_or(url).trim_matches('/');

    // Reject traversal before touching the filesystem
    if clean.contains("..") {
        return None;
    }

    let local = serve_root.join(clean);

    // Canonicalize to resolve symlinks and verify the path is under the root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }
    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }
    None
}

/// Inject the refresh script tag before `</body>` (or append when absent;
/// browsers handle that gracefully).
fn inject_livereload(content: &[u8]) -> Vec<u8> {
    let script = embed::livereload_script_tag();
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    if let Some(pos) = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        result.extend_from_slice(&content[..pos]);
        result.extend_from_slice(script_bytes);
        result.extend_from_slice(&content[pos..]);
    } else {
        result.extend_from_slice(content);
        result.extend_from_slice(script_bytes);
    }
    result
}

/// Guess MIME type from file extension.
fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => HTML,
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => JAVASCRIPT,
        Some("json") => "application/json",
        Some("md") => "text/markdown; charset=utf-8",
        Some("txt") => PLAIN,
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_resolve_file_and_directory_index() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.html"), "<html></html>").unwrap();
        fs::write(tmp.path().join("00_title.md"), "# hi").unwrap();

        let index = resolve_path("/", tmp.path()).unwrap();
        assert!(index.ends_with("index.html"));

        let md = resolve_path("/00_title.md", tmp.path()).unwrap();
        assert!(md.ends_with("00_title.md"));

        assert!(resolve_path("/nope.md", tmp.path()).is_none());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.html"), "x").unwrap();
        assert!(resolve_path("/../etc/passwd", tmp.path()).is_none());
    }

    #[test]
    fn test_resolve_strips_query() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.html"), "x").unwrap();
        assert!(resolve_path("/index.html?cache=1", tmp.path()).is_some());
    }

    #[test]
    fn test_inject_before_body_close() {
        let html = b"<html><body><p>hi</p></body></html>";
        let out = inject_livereload(html);
        let out = String::from_utf8(out).unwrap();
        let script_pos = out.find("__livereload.js").unwrap();
        let body_pos = out.find("</body>").unwrap();
        assert!(script_pos < body_pos);
    }

    #[test]
    fn test_inject_appends_without_body_close() {
        let out = inject_livereload(b"<p>bare</p>");
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("<p>bare</p><script"));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("index.html")), HTML);
        assert_eq!(mime_for(Path::new("00_title.md")), "text/markdown; charset=utf-8");
        assert_eq!(mime_for(Path::new("unknown.xyz")), "application/octet-stream");
    }
}
