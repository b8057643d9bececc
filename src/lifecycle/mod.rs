//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Initialize vendor session → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C received → Trigger broadcast → Server drains → Exit
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
