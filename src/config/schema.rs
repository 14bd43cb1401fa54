//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origins for tool and general traffic.
    pub upstreams: UpstreamsConfig,

    /// Dashboard static assets. Absent = headless mode.
    pub dashboard: Option<DashboardConfig>,

    /// Ordered routing table. First match wins; the last rule must be a catch-all.
    pub routes: Vec<RouteRuleConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            upstreams: UpstreamsConfig::default(),
            dashboard: None,
            routes: default_routes(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origins.
///
/// Accepts either a URL (`http://127.0.0.1:9090`) or a bare `host:port`.
/// The general backend has no default: deployments disagree on its port, so it
/// must always be configured explicitly.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Tool (MCP) backend origin.
    pub tool: String,

    /// General API backend origin.
    pub general: Option<String>,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            tool: "http://127.0.0.1:9090".to_string(),
            general: None,
        }
    }
}

/// Dashboard (static asset) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Asset root directory. A leading `~` expands to `$HOME`.
    pub root: PathBuf,

    /// Root document served for the exact `/` path, relative to `root`.
    pub index: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("~/gaianet/dashboard"),
            index: "index.html".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Root directory with a leading `~` expanded from `$HOME`.
    pub fn resolved_root(&self) -> PathBuf {
        expand_home(&self.root, std::env::var_os("HOME").map(PathBuf::from))
    }

    /// Path of the root document.
    pub fn index_path(&self) -> PathBuf {
        self.resolved_root().join(&self.index)
    }
}

fn expand_home(path: &std::path::Path, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Destination class a route rule dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    /// Forward to the tool backend.
    Tool,
    /// Forward to the general backend.
    General,
    /// Serve from the dashboard asset root.
    Static,
    /// Serve the dashboard root document.
    DashboardIndex,
}

impl DestinationKind {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Tool => "tool",
            DestinationKind::General => "general",
            DestinationKind::Static => "static",
            DestinationKind::DashboardIndex => "dashboard_index",
        }
    }

    /// True for destinations that only exist in dashboard mode.
    pub fn requires_dashboard(&self) -> bool {
        matches!(self, DestinationKind::Static | DestinationKind::DashboardIndex)
    }
}

/// A single routing rule.
///
/// Conditions combine with AND semantics. A rule without any condition is a
/// catch-all.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteRuleConfig {
    /// Rule identifier for logging.
    pub name: String,

    /// Path must equal this value.
    #[serde(default)]
    pub exact: Option<String>,

    /// Path must start with one of these prefixes.
    #[serde(default)]
    pub prefixes: Vec<String>,

    /// Path must start with none of these prefixes.
    #[serde(default)]
    pub exclude_prefixes: Vec<String>,

    /// Where matching requests go.
    pub destination: DestinationKind,
}

impl RouteRuleConfig {
    /// True if the rule has no conditions.
    pub fn is_catch_all(&self) -> bool {
        self.exact.is_none() && self.prefixes.is_empty() && self.exclude_prefixes.is_empty()
    }
}

fn rule(name: &str, destination: DestinationKind) -> RouteRuleConfig {
    RouteRuleConfig {
        name: name.to_string(),
        exact: None,
        prefixes: Vec::new(),
        exclude_prefixes: Vec::new(),
        destination,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The stock routing table.
///
/// Dashboard rules are dropped at compile time when no dashboard is configured.
pub fn default_routes() -> Vec<RouteRuleConfig> {
    vec![
        RouteRuleConfig {
            exact: Some("/".to_string()),
            ..rule("dashboard-index", DestinationKind::DashboardIndex)
        },
        RouteRuleConfig {
            exact: Some("/health".to_string()),
            ..rule("health", DestinationKind::Tool)
        },
        RouteRuleConfig {
            prefixes: strings(&["/mcp/", "/v1/mcp/"]),
            ..rule("mcp", DestinationKind::Tool)
        },
        RouteRuleConfig {
            prefixes: strings(&["/_next/", "/fonts/", "/chatbot-ui/"]),
            ..rule("dashboard-assets", DestinationKind::Static)
        },
        RouteRuleConfig {
            exclude_prefixes: strings(&["/v1/", "/admin/"]),
            ..rule("dashboard-fallback", DestinationKind::Static)
        },
        rule("general", DestinationKind::General),
    ]
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed until the upstream sends its response head, in seconds.
    /// Streaming bodies are not bounded by this.
    pub response_secs: u64,

    /// Idle pooled connection timeout in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            response_secs: 120,
            idle_secs: 90,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
