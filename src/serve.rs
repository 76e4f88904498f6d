//! Local preview server for the generated site.
//!
//! A plain blocking HTTP/1.1 file server over the output directory, handling
//! one connection at a time. Every response closes its connection and
//! files are read fresh per request, so a rebuild shows up on reload.
//!
//! ## Routing
//!
//! - `/` serves `/index.html`; any directory serves its `index.html`
//! - query strings and fragments are ignored
//! - path segments are percent-decoded (`OnePlus%207.json`)
//! - a path that climbs out of the root with `..` gets `403 Forbidden`
//! - a missing file gets `404 Not Found` with a small HTML page
//! - `OPTIONS` gets `204`; methods other than `GET`/`HEAD` get `405`
//!
//! Every response carries permissive CORS headers and `Cache-Control: no-cache`.

use maud::{DOCTYPE, html};
use percent_encoding::percent_decode_str;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Upper bound on request line plus headers.
const MAX_REQUEST_HEAD: u64 = 8 * 1024;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Output directory not found: {0} (run `rom-catalog build` first)")]
    MissingRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A response ready to be written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", body)
    }

    /// Serialize status line, headers and (unless `head_only`) body.
    pub fn to_bytes(&self, head_only: bool) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Cache-Control: no-cache\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Access-Control-Allow-Methods: GET, HEAD, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type\r\n\
             Connection: close\r\n\
             \r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        )
        .into_bytes();
        if !head_only {
            out.extend_from_slice(&self.body);
        }
        out
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

/// Bind `127.0.0.1:<port>` and serve `root` until the process is stopped.
pub fn serve(root: &Path, port: u16) -> Result<(), ServeError> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;
    log::info!("Serving {} at http://localhost:{port}", root.display());
    serve_listener(listener, root)
}

/// Serve `root` on an already bound listener, one connection at a time.
pub fn serve_listener(listener: TcpListener, root: &Path) -> Result<(), ServeError> {
    let root = root
        .canonicalize()
        .map_err(|_| ServeError::MissingRoot(root.to_path_buf()))?;

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = handle_connection(stream, &root) {
                    log::warn!("Connection error: {e}");
                }
            }
            Err(e) => log::warn!("Accept failed: {e}"),
        }
    }
    Ok(())
}

/// How reading the request line and headers ended.
#[derive(Debug, PartialEq, Eq)]
enum RequestHead {
    /// The client closed before sending anything.
    Closed,
    /// Request line, headers and the blank line all arrived.
    Complete(String),
    /// The head ended early or ran past [`MAX_REQUEST_HEAD`].
    Truncated,
}

/// Read the request line and drain the headers, reading at most
/// [`MAX_REQUEST_HEAD`] bytes. Header contents do not affect the response.
fn read_request_head<R: BufRead>(reader: R) -> std::io::Result<RequestHead> {
    let mut reader = reader.take(MAX_REQUEST_HEAD);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(RequestHead::Closed);
    }

    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(RequestHead::Truncated);
        }
        if header.trim_end().is_empty() {
            return Ok(RequestHead::Complete(request_line));
        }
    }
}

fn handle_connection(stream: TcpStream, root: &Path) -> std::io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    let bad_request = || {
        let mut stream = &stream;
        stream.write_all(&Response::text(400, "Bad Request").to_bytes(false))
    };

    let request_line = match read_request_head(BufReader::new(&stream))? {
        RequestHead::Closed => return Ok(()),
        RequestHead::Truncated => return bad_request(),
        RequestHead::Complete(line) => line,
    };

    let mut parts = request_line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(m), Some(t)) => (m, t),
        _ => return bad_request(),
    };

    let response = respond(root, method, target);
    log::info!("{method} {target} {}", response.status);

    let mut stream = &stream;
    stream.write_all(&response.to_bytes(method == "HEAD"))?;
    stream.flush()
}

/// Build the response for one request against `root`.
///
/// `root` must already be canonical, as [`serve_listener`] makes it.
pub fn respond(root: &Path, method: &str, target: &str) -> Response {
    match method {
        "GET" | "HEAD" => {}
        "OPTIONS" => return Response::new(204, "text/plain; charset=utf-8", Vec::new()),
        _ => return Response::text(405, "Method Not Allowed"),
    }

    let Some(mut path) = resolve_path(root, target) else {
        return Response::text(403, "Forbidden");
    };
    if path.is_dir() {
        path = path.join("index.html");
    }

    // Symlinks must not lead out of the root either.
    if let Ok(real) = path.canonicalize() {
        if !real.starts_with(root) {
            return Response::text(403, "Forbidden");
        }
    }

    match fs::read(&path) {
        Ok(body) => Response::new(200, mime_type(&path), body),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => not_found(),
        Err(_) if path.is_dir() => not_found(),
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            Response::text(500, "Server Error")
        }
    }
}

/// Map a request target onto a path under `root`.
///
/// Segments are percent-decoded before they are checked. Returns `None` when
/// the path climbs above `root` or a decoded segment is not a plain name.
pub fn resolve_path(root: &Path, target: &str) -> Option<PathBuf> {
    let path = target
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path = if path == "/" || path.is_empty() {
        "/index.html"
    } else {
        path
    };

    let mut segments = Vec::new();
    for raw in path.split('/') {
        let segment = percent_decode_str(raw).decode_utf8().ok()?;
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            segments.pop()?;
            continue;
        }
        if segment.contains(['/', '\\', '\0']) || has_prefix(&segment) {
            return None;
        }
        segments.push(segment);
    }

    Some(segments.iter().fold(root.to_path_buf(), |acc, s| acc.join(s.as_ref())))
}

/// True for segments the platform would read as a drive or root (`C:`).
fn has_prefix(segment: &str) -> bool {
    Path::new(segment)
        .components()
        .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "eot" => "application/vnd.ms-fontobject",
        _ => "application/octet-stream",
    }
}

fn not_found() -> Response {
    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "404 - Not Found" }
                style { "body{font-family:sans-serif;text-align:center;padding:4rem}" }
            }
            body {
                h1 { "404" }
                p { "Page not found." }
                a href="/" { "Back to the catalog" }
            }
        }
    };
    Response::new(404, "text/html; charset=utf-8", page.into_string())
}
