//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → report.rs (token state, vendor facts, recorder snapshot)
//!     → status.rs (numeric status code from token + last failure)
//!     → uptime.rs (human readable process uptime)
//! ```
//!
//! # Design Decisions
//! - The health endpoint never fails; unknown conditions surface as code 8
//! - Failures stay visible after they stop affecting the status code

pub mod report;
pub mod status;
pub mod uptime;

pub use report::{health_handler, HealthChecks, HealthReport, LastFailureReport, RequestsReport};
pub use status::{derive_status_code, AuthTokenStatus, DEFAULT_FAILURE_SCORING_SECS};
pub use uptime::format_uptime;
