//! Request dispatch.
//!
//! A [`Gateway`] owns the compiled route table, the resolved upstream targets
//! and the forwarder. It is built once by [`crate::lifecycle::startup`] and
//! shared read-only by every request.

use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};

use crate::config::DestinationKind;
use crate::http::static_files;
use crate::observability::metrics;
use crate::routing::{decode_path, Destination, RouteTable};
use crate::upstream::{Forwarder, UpstreamTarget, UpstreamTargets};

pub struct Gateway {
    routes: RouteTable,
    upstreams: UpstreamTargets,
    forwarder: Forwarder,
}

impl Gateway {
    pub fn new(routes: RouteTable, upstreams: UpstreamTargets, forwarder: Forwarder) -> Self {
        Self {
            routes,
            upstreams,
            forwarder,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn upstreams(&self) -> &UpstreamTargets {
        &self.upstreams
    }

    /// Route one request and produce its response.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        // Match on the decoded path; backends and the static server still get the raw one.
        let (rule, destination) = self.routes.lookup(&decode_path(&path));
        let kind = destination.kind();

        tracing::debug!(
            method = %method,
            path = %path,
            rule = %rule,
            destination = kind.as_str(),
            "Routing request"
        );

        let response = match destination {
            Destination::ToolBackend => self.forward(request, &self.upstreams.tool, kind).await,
            Destination::GeneralBackend => {
                self.forward(request, &self.upstreams.general, kind).await
            }
            Destination::StaticRoot(root) => static_files::serve_dir(root, &path, request).await,
            Destination::DashboardIndex(index) => static_files::serve_file(index, request).await,
        };

        metrics::record_request(kind.as_str(), response.status().as_u16(), start_time);
        response
    }

    async fn forward(
        &self,
        request: Request<Body>,
        target: &UpstreamTarget,
        kind: DestinationKind,
    ) -> Response {
        match self.forwarder.forward(request, target).await {
            Ok(response) => {
                if response.status().is_server_error() {
                    tracing::warn!(upstream = %target, status = %response.status(), "Upstream returned server error");
                }
                response
            }
            Err(e) => {
                tracing::error!(upstream = %target, error = %e, "Upstream error");
                metrics::record_upstream_error(kind.as_str(), e.kind());
                e.into_response()
            }
        }
    }
}
