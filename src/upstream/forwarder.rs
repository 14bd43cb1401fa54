//! Upstream forwarding.
//!
//! # Responsibilities
//! - Send rewritten requests over a shared, pooled HTTP/1 client
//! - Stream the upstream response back untouched
//! - Turn transport failures into gateway error responses
//!
//! # Design Decisions
//! - Request and response bodies are streamed, never buffered
//! - Only the wait for the response head is bounded; long streamed bodies are not cut off
//! - No retries

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::response::IntoResponse;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::http::request::{rewrite_request, RewriteError};
use crate::upstream::UpstreamTarget;

/// Why a request could not be forwarded.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Outbound request could not be built.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// Connection refused, reset, or failed mid-exchange.
    #[error("upstream {target} unreachable: {source}")]
    Upstream {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// Upstream did not answer in time.
    #[error("upstream {target} did not respond within {timeout:?}")]
    Timeout { target: String, timeout: Duration },
}

impl ForwardError {
    /// Status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::Rewrite(_) | ForwardError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::Rewrite(_) => "rewrite",
            ForwardError::Upstream { .. } => "unreachable",
            ForwardError::Timeout { .. } => "timeout",
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> axum::response::Response {
        let message = match self {
            ForwardError::Timeout { .. } => "Upstream timed out",
            _ => "Upstream request failed",
        };
        (self.status(), message).into_response()
    }
}

/// Forwards requests to upstream targets.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    response_timeout: Duration,
}

impl Forwarder {
    /// Build a forwarder with connection pooling and the configured timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .build(connector);

        Self {
            client,
            response_timeout: Duration::from_secs(timeouts.response_secs),
        }
    }

    /// Rewrite `request` for `target`, send it, and return the upstream response as-is.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target: &UpstreamTarget,
    ) -> Result<Response<Body>, ForwardError> {
        let request = rewrite_request(request, target)?;

        let pending = self.client.request(request);
        let response: hyper::Response<Incoming> =
            match tokio::time::timeout(self.response_timeout, pending).await {
                Ok(Ok(response)) => response,
                Ok(Err(source)) => {
                    return Err(ForwardError::Upstream {
                        target: target.to_string(),
                        source,
                    })
                }
                Err(_) => {
                    return Err(ForwardError::Timeout {
                        target: target.to_string(),
                        timeout: self.response_timeout,
                    })
                }
            };

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
