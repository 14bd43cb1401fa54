//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Resolve upstream targets and the dashboard root
//! - Compile the route table and build the forwarder
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, the listener is never bound
//! - Produces an immutable [`Gateway`]; nothing is resolved per request

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{validate_config, ConfigError, GatewayConfig};
use crate::gateway::Gateway;
use crate::routing::{DashboardPaths, RouteError, RouteTable};
use crate::upstream::{Forwarder, UpstreamError, UpstreamTarget, UpstreamTargets};

/// Reasons the gateway refuses to start serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid upstream: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("dashboard root {0} is not a readable directory")]
    MissingStaticRoot(PathBuf),

    #[error("route table: {0}")]
    Routes(#[from] RouteError),
}

/// Turn a configuration into a ready-to-serve gateway.
pub fn initialize(config: &GatewayConfig) -> Result<Gateway, StartupError> {
    validate_config(config).map_err(|errors| StartupError::Config(ConfigError::Validation(errors)))?;

    let tool = UpstreamTarget::parse(&config.upstreams.tool)?;
    let general = config
        .upstreams
        .general
        .as_deref()
        .map(UpstreamTarget::parse)
        .transpose()?
        .ok_or_else(|| {
            StartupError::Config(ConfigError::Validation(vec![
                crate::config::ValidationError::MissingGeneralUpstream,
            ]))
        })?;

    let dashboard = match &config.dashboard {
        Some(dashboard) => {
            let root = dashboard.resolved_root();
            if !root.is_dir() {
                return Err(StartupError::MissingStaticRoot(root));
            }
            let index = dashboard.index_path();
            if !index.is_file() {
                tracing::warn!(index = %index.display(), "Dashboard index document not found; '/' will return 404");
            }
            Some(DashboardPaths { root, index })
        }
        None => None,
    };

    let routes = RouteTable::compile(&config.routes, dashboard.as_ref())?;
    let forwarder = Forwarder::new(&config.timeouts);

    tracing::info!(upstream = %tool, "Tool backend");
    tracing::info!(upstream = %general, "General backend");
    match &dashboard {
        Some(d) => tracing::info!(root = %d.root.display(), "Serving dashboard static files"),
        None => tracing::info!("Headless mode: no dashboard, static rules disabled"),
    }
    for route in routes.routes() {
        tracing::debug!(
            rule = %route.name,
            destination = route.destination().kind().as_str(),
            "Route active"
        );
    }

    Ok(Gateway::new(routes, UpstreamTargets { tool, general }, forwarder))
}
