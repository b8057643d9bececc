//! Request outcome tracking subsystem.
//!
//! # Data Flow
//! ```text
//! Every non-health response
//!     → http/middleware/tracking.rs (status + failure message)
//!     → recorder.rs (counters, sticky last failure)
//!
//! Health request
//!     → recorder.rs statistics() / last_failure()
//!     → health/status.rs (status code derivation)
//! ```

pub mod clock;
pub mod recorder;

pub use clock::{Clock, ManualClock, SystemClock};
pub use recorder::{
    is_success, LastFailure, OverallCounts, RequestRecorder, RequestStatistics,
    DEFAULT_FAILURE_REPLACEMENT_SECS,
};
