//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses (listener, upstreams, metrics)
//! - Check the route table shape (catch-all last, patterns well formed)
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Filesystem checks (dashboard root exists) happen at startup, not here

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, RouteRuleConfig};
use crate::upstream::{UpstreamError, UpstreamTarget};

/// A single semantic problem in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstreams.{name}: {source}")]
    Upstream {
        name: &'static str,
        #[source]
        source: UpstreamError,
    },

    #[error("upstreams.general must be set explicitly")]
    MissingGeneralUpstream,

    #[error("routes must not be empty")]
    NoRoutes,

    #[error("last route '{0}' must be a catch-all (no exact, prefixes or exclude_prefixes)")]
    MissingCatchAll(String),

    #[error("catch-all route '{0}' must target tool or general")]
    CatchAllNotBackend(String),

    #[error("catch-all route '{0}' makes the rules after it unreachable")]
    UnreachableRules(String),

    #[error("route '{route}': pattern '{pattern}' must start with '/'")]
    RelativePattern { route: String, pattern: String },

    #[error("route '{0}' combines exact with prefixes")]
    ExactWithPrefixes(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(source) = UpstreamTarget::parse(&config.upstreams.tool) {
        errors.push(ValidationError::Upstream { name: "tool", source });
    }
    match &config.upstreams.general {
        Some(general) => {
            if let Err(source) = UpstreamTarget::parse(general) {
                errors.push(ValidationError::Upstream { name: "general", source });
            }
        }
        None => errors.push(ValidationError::MissingGeneralUpstream),
    }

    validate_routes(&config.routes, &mut errors);

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("response_secs", timeouts.response_secs),
        ("idle_secs", timeouts.idle_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(routes: &[RouteRuleConfig], errors: &mut Vec<ValidationError>) {
    let Some((last, leading)) = routes.split_last() else {
        errors.push(ValidationError::NoRoutes);
        return;
    };

    for route in routes {
        let patterns = route
            .exact
            .iter()
            .chain(route.prefixes.iter())
            .chain(route.exclude_prefixes.iter());
        for pattern in patterns {
            if !pattern.starts_with('/') {
                errors.push(ValidationError::RelativePattern {
                    route: route.name.clone(),
                    pattern: pattern.clone(),
                });
            }
        }
        if route.exact.is_some() && !route.prefixes.is_empty() {
            errors.push(ValidationError::ExactWithPrefixes(route.name.clone()));
        }
    }

    if let Some(early) = leading.iter().find(|r| r.is_catch_all()) {
        errors.push(ValidationError::UnreachableRules(early.name.clone()));
    }

    if !last.is_catch_all() {
        errors.push(ValidationError::MissingCatchAll(last.name.clone()));
    } else if last.destination.requires_dashboard() {
        errors.push(ValidationError::CatchAllNotBackend(last.name.clone()));
    }
}
