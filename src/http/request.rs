//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a request ID for the tracing span
//! - Rewrite the request so it addresses the selected upstream
//!
//! # Design Decisions
//! - The request ID lives in the span only; forwarded headers are untouched
//! - Rewriting changes scheme, authority, Host and version. Method, headers,
//!   extensions and body pass through as-is.

use axum::body::Body;
use axum::http::uri::{self, PathAndQuery};
use axum::http::{header, Request, Uri, Version};
use thiserror::Error;
use tracing::Span;
use uuid::Uuid;

use crate::upstream::UpstreamTarget;

/// Failure to build the outbound URI.
#[derive(Debug, Error)]
#[error("cannot address upstream {target}: {source}")]
pub struct RewriteError {
    target: String,
    #[source]
    source: uri::InvalidUriParts,
}

/// Point `request` at `target`.
pub fn rewrite_request(
    request: Request<Body>,
    target: &UpstreamTarget,
) -> Result<Request<Body>, RewriteError> {
    let (mut parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    let mut uri_parts = uri::Parts::default();
    uri_parts.scheme = Some(target.scheme().clone());
    uri_parts.authority = Some(target.authority().clone());
    uri_parts.path_and_query = Some(path_and_query);

    parts.uri = Uri::from_parts(uri_parts).map_err(|source| RewriteError {
        target: target.to_string(),
        source,
    })?;
    parts
        .headers
        .insert(header::HOST, target.host_header().clone());
    // Upstream connections are HTTP/1; an h2 inbound request would be refused by the client.
    parts.version = Version::HTTP_11;

    Ok(Request::from_parts(parts, body))
}

/// Span for one inbound request, keyed by a fresh request ID.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = Uuid::new_v4();
    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}
