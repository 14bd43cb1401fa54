//! Static asset serving for dashboard mode.
//!
//! # Responsibilities
//! - Resolve request paths against the asset root without escaping it
//! - Serve files (content type, conditional and range requests via tower-http)
//! - Map every lookup failure to 404

use std::io;
use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::ServeFile;

const DIRECTORY_INDEX: &str = "index.html";

/// Resolve `request_path` under `root`.
///
/// The path is percent-decoded and normalized lexically. Returns `None` when a
/// `..` would climb above `root` or a segment is not a plain file name.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    if decoded.contains('\0') || decoded.contains('\\') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => {
                let mut components = Path::new(other).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(other),
                    _ => return None,
                }
            }
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    Some(resolved)
}

/// Serve `request_path` from the asset tree at `root`.
pub async fn serve_dir(root: &Path, request_path: &str, request: Request<Body>) -> Response {
    let Some(mut path) = resolve(root, request_path) else {
        tracing::warn!(path = %request_path, "Rejected static path outside root");
        return not_found();
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_dir() => {
            if !request_path.ends_with('/') {
                return redirect_to_directory(request_path, &request);
            }
            path.push(DIRECTORY_INDEX)
        }
        Ok(_) => {}
        Err(e) => {
            log_lookup_failure(&path, &e);
            return not_found();
        }
    }

    serve_file(&path, request).await
}

/// Serve one file, or 404 if it cannot be read.
pub async fn serve_file(path: &Path, request: Request<Body>) -> Response {
    // ServeFile answers unreadable files with 500; open first so they become 404.
    let metadata = match tokio::fs::File::open(path).await {
        Ok(file) => file.metadata().await,
        Err(e) => Err(e),
    };
    match metadata {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            tracing::debug!(path = %path.display(), "Static path is not a file");
            return not_found();
        }
        Err(e) => {
            log_lookup_failure(path, &e);
            return not_found();
        }
    }

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(infallible) => match infallible {},
    }
}

/// Send `/dir` to `/dir/` so relative links in its index resolve correctly.
fn redirect_to_directory(request_path: &str, request: &Request<Body>) -> Response {
    let mut location = format!("{}/", request_path);
    if let Some(query) = request.uri().query() {
        location.push('?');
        location.push_str(query);
    }
    match HeaderValue::from_str(&location) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response(),
        Err(_) => not_found(),
    }
}

fn log_lookup_failure(path: &Path, error: &io::Error) {
    match error.kind() {
        io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Static file not found");
        }
        _ => {
            tracing::warn!(path = %path.display(), error = %error, "Static file unreadable");
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
