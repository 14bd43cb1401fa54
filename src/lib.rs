//! MCP Gateway Library
//!
//! Path-based HTTP gateway: tool traffic to the tool backend, everything else
//! to the general backend, and (in dashboard mode) static assets from disk.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::GatewayConfig;
pub use gateway::Gateway;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Destination, RouteTable};
