//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile configured rules into matchers
//! - Drop dashboard rules when running headless
//! - Classify a path into exactly one destination
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) sequential scan; the table is small and static
//! - The catch-all is held apart from the scanned rules, so `classify` is total

use std::borrow::Cow;
use std::path::PathBuf;

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::config::{DestinationKind, RouteRuleConfig};
use crate::routing::matcher::{
    AndMatcher, ExactPathMatcher, ExcludePrefixMatcher, Matcher, PathPrefixMatcher,
};

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    ToolBackend,
    GeneralBackend,
    /// Serve from this asset root.
    StaticRoot(PathBuf),
    /// Serve this file.
    DashboardIndex(PathBuf),
}

impl Destination {
    pub fn kind(&self) -> DestinationKind {
        match self {
            Destination::ToolBackend => DestinationKind::Tool,
            Destination::GeneralBackend => DestinationKind::General,
            Destination::StaticRoot(_) => DestinationKind::Static,
            Destination::DashboardIndex(_) => DestinationKind::DashboardIndex,
        }
    }
}

/// Resolved dashboard locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPaths {
    pub root: PathBuf,
    pub index: PathBuf,
}

/// Errors produced while compiling the route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route table is empty")]
    Empty,

    #[error("route table must end with a catch-all rule")]
    MissingCatchAll,

    #[error("catch-all rule '{0}' must target the tool or general backend")]
    CatchAllNotBackend(String),
}

/// A compiled rule.
#[derive(Debug)]
pub struct Route {
    pub name: String,
    matcher: AndMatcher,
    destination: Destination,
}

impl Route {
    pub fn destination(&self) -> &Destination {
        &self.destination
    }
}

/// Ordered, immutable routing table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Destination,
    fallback_name: String,
}

impl RouteTable {
    /// Compile the configured rules.
    ///
    /// With `dashboard` unset, static and dashboard-index rules are skipped.
    pub fn compile(
        rules: &[RouteRuleConfig],
        dashboard: Option<&DashboardPaths>,
    ) -> Result<Self, RouteError> {
        let (last, leading) = rules.split_last().ok_or(RouteError::Empty)?;

        if !last.is_catch_all() {
            return Err(RouteError::MissingCatchAll);
        }
        let fallback = match last.destination {
            DestinationKind::Tool => Destination::ToolBackend,
            DestinationKind::General => Destination::GeneralBackend,
            _ => return Err(RouteError::CatchAllNotBackend(last.name.clone())),
        };

        let mut routes = Vec::with_capacity(leading.len());
        for rule in leading {
            let destination = match (rule.destination, dashboard) {
                (DestinationKind::Tool, _) => Destination::ToolBackend,
                (DestinationKind::General, _) => Destination::GeneralBackend,
                (DestinationKind::Static, Some(d)) => Destination::StaticRoot(d.root.clone()),
                (DestinationKind::DashboardIndex, Some(d)) => {
                    Destination::DashboardIndex(d.index.clone())
                }
                (kind, None) => {
                    tracing::debug!(rule = %rule.name, destination = kind.as_str(), "Skipping dashboard rule (headless)");
                    continue;
                }
            };

            routes.push(Route {
                name: rule.name.clone(),
                matcher: compile_matcher(rule),
                destination,
            });
        }

        Ok(Self {
            routes,
            fallback,
            fallback_name: last.name.clone(),
        })
    }

    /// Classify a path. Total: every string maps to a destination.
    pub fn classify(&self, path: &str) -> &Destination {
        self.lookup(path).1
    }

    /// Like [`classify`](Self::classify), also returning the matching rule's name.
    pub fn lookup(&self, path: &str) -> (&str, &Destination) {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(path))
            .map(|route| (route.name.as_str(), &route.destination))
            .unwrap_or((self.fallback_name.as_str(), &self.fallback))
    }

    /// Active (non-fallback) rules in evaluation order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// Percent-decode a request path for matching.
///
/// Rules see the decoded form, so `/%6Dcp/x` matches like `/mcp/x`. A path that
/// does not decode to UTF-8 is returned unchanged.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

fn compile_matcher(rule: &RouteRuleConfig) -> AndMatcher {
    let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
    if let Some(exact) = &rule.exact {
        matchers.push(Box::new(ExactPathMatcher::new(exact.clone())));
    }
    if !rule.prefixes.is_empty() {
        matchers.push(Box::new(PathPrefixMatcher::new(rule.prefixes.clone())));
    }
    if !rule.exclude_prefixes.is_empty() {
        matchers.push(Box::new(ExcludePrefixMatcher::new(rule.exclude_prefixes.clone())));
    }
    AndMatcher::new(matchers)
}
