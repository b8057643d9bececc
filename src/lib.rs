//! ViCare REST gateway library.
//!
//! Exposes heat pump, DHW, ventilation and Loxone state over a small REST API
//! and reports its own health from recorded request outcomes.

// Core subsystems
pub mod api;
pub mod config;
pub mod http;
pub mod tracking;

// Upstream integrations
pub mod loxone;
pub mod vendor;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use tracking::RequestRecorder;
