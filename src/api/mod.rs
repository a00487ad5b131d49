//! HTTP surface of the clinic records server.
//!
//! The router is composable — `app_router()` returns a `Router` that
//! can be mounted on any axum server instance. All data routes sit
//! behind the session login gate.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::app_router;
pub use types::ApiContext;
