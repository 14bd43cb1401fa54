//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line / environment overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → lifecycle::startup resolves it into the Gateway
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs, except the general upstream
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, ConfigError};
pub use schema::{
    DashboardConfig, DestinationKind, GatewayConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RouteRuleConfig, TimeoutConfig, UpstreamsConfig,
};
pub use validation::{validate_config, ValidationError};
