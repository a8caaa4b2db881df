//! HTTP surface of the verification service
//!
//! Exposed as a library so integration tests can build the same `App` that
//! the binary serves.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use state::{AppState, DynVerificationService};
