//! MCP Gateway
//!
//! Single-process HTTP gateway in front of the tool (MCP) backend, the general
//! API backend and, optionally, the dashboard's static assets.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                      GATEWAY                         │
//!   Client Request    │  ┌─────────┐    ┌──────────┐    ┌──────────────┐     │
//!   ──────────────────┼─▶│  http   │───▶│ gateway  │───▶│   routing    │     │
//!                     │  │ server  │    │ dispatch │    │  RouteTable  │     │
//!                     │  └─────────┘    └────┬─────┘    └──────────────┘     │
//!                     │                      │                               │
//!                     │          ┌───────────┴────────────┐                  │
//!                     │          ▼                        ▼                  │
//!                     │  ┌───────────────┐        ┌───────────────┐          │
//!                     │  │   upstream    │        │ static_files  │          │
//!                     │  │  forwarder    │        │ (dashboard)   │          │
//!                     │  └───────┬───────┘        └───────────────┘          │
//!                     └──────────┼───────────────────────────────────────────┘
//!                                ▼
//!                   tool backend / general backend
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mcp_gateway::config::{read_config, DashboardConfig, GatewayConfig};
use mcp_gateway::lifecycle::{self, signals, Shutdown};
use mcp_gateway::observability::{logging, metrics};
use mcp_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "mcp-gateway")]
#[command(about = "Routes MCP, API and dashboard traffic to the right place", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(long, env = "GATEWAY_LISTEN")]
    listen: Option<String>,

    /// Tool (MCP) backend origin.
    #[arg(long, env = "GATEWAY_TOOL_UPSTREAM")]
    tool_upstream: Option<String>,

    /// General API backend origin.
    #[arg(long, env = "GATEWAY_GENERAL_UPSTREAM")]
    general_upstream: Option<String>,

    /// Serve the dashboard from this directory.
    #[arg(long, env = "GATEWAY_DASHBOARD_ROOT", conflicts_with = "headless")]
    dashboard_root: Option<PathBuf>,

    /// Disable dashboard serving even if the config file enables it.
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn apply(&self, config: &mut GatewayConfig) {
        if let Some(listen) = &self.listen {
            config.listener.bind_address = listen.clone();
        }
        if let Some(tool) = &self.tool_upstream {
            config.upstreams.tool = tool.clone();
        }
        if let Some(general) = &self.general_upstream {
            config.upstreams.general = Some(general.clone());
        }
        if let Some(root) = &self.dashboard_root {
            let dashboard = config.dashboard.get_or_insert_with(DashboardConfig::default);
            dashboard.root = root.clone();
        }
        if self.headless {
            config.dashboard = None;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => GatewayConfig::default(),
    };
    cli.apply(&mut config);

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mcp-gateway starting");

    let gateway = match lifecycle::initialize(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed to initialize");
            return Err(e.into());
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(gateway);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
