//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request span)
//!     → gateway (route table decides destination)
//!     → backend: request.rs (rewrite) → upstream forwarder
//!     → static:  static_files.rs (resolve under root, stream file)
//!     → Send to client
//! ```

pub mod request;
pub mod server;
pub mod static_files;

pub use request::{rewrite_request, RewriteError};
pub use server::HttpServer;
