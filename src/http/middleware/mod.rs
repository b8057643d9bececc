//! HTTP middleware.

pub mod tracking;

pub use tracking::{
    failure_message, metric_endpoint, track_outcome, UNKNOWN_FAILURE_MESSAGE, UNMATCHED_ROUTE,
};
