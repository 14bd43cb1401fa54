//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     upstreams.tool / upstreams.general (config strings)
//!     → target.rs (parse once into UpstreamTarget)
//!     → UpstreamTargets, shared read-only
//!
//! Per request (backend destinations only):
//!     → forwarder.rs (rewrite, send over pooled client, stream back)
//!     → 502 / 504 on failure
//! ```

pub mod forwarder;
pub mod target;

pub use forwarder::{ForwardError, Forwarder};
pub use target::{UpstreamError, UpstreamTarget};

/// The two backend origins the gateway forwards to.
#[derive(Debug, Clone)]
pub struct UpstreamTargets {
    pub tool: UpstreamTarget,
    pub general: UpstreamTarget,
}
