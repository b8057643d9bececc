//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → middleware/tracking.rs (outcome recorded after the handler ran)
//!     → api/ or health/ handlers
//!     → error.rs (plain-text error body + failure message)
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::{ApiError, FailureMessage};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
