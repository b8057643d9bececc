//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Tracking middleware:
//!     → metrics.rs (request counter per endpoint and status)
//! Health handler:
//!     → metrics.rs (derived status code gauge)
//! All subsystems:
//!     → logging.rs (structured log events via tracing)
//! ```
//!
//! # Design Decisions
//! - Pretty format for development, JSON for log aggregation
//! - Metrics are optional; recording without an installed recorder is a no-op

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
