//! API composition root
//!
//! Everything the binary needs apart from `main` itself lives here so that
//! the end-to-end tests can build the same router over in-memory adapters.
//!
//! - [`config`] - environment-driven settings
//! - [`telemetry`] - tracing subscriber setup
//! - [`app`] - router composition, middleware stack and health check

pub mod app;
pub mod config;
pub mod telemetry;

pub use app::{AppState, build_router};
pub use config::AppConfig;
