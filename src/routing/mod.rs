//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → decode_path (percent-decoded once)
//!     → router.rs (ordered scan, first match wins)
//!     → matcher.rs (evaluate exact / prefix / exclude conditions)
//!     → Return: Destination (never "no match")
//!
//! Route Compilation (at startup):
//!     RouteRuleConfig[] + optional dashboard paths
//!     → Drop dashboard rules when headless
//!     → Compile matchers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered as configured)

pub mod matcher;
pub mod router;

pub use router::{decode_path, DashboardPaths, Destination, RouteError, RouteTable};
