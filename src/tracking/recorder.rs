//! Thread-safe request outcome recorder.
//!
//! # Responsibilities
//! - Count responses per (endpoint, status code)
//! - Keep the most relevant failure in a single sticky slot
//! - Hand out independent snapshots for the health report
//!
//! # Design Decisions
//! - One mutex guards both the counters and the failure slot
//! - Readers copy under the lock and aggregate after releasing it
//! - A poisoned lock is recovered; recording never fails

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::tracking::clock::Clock;

/// Seconds a stored failure stays in the slot before a newer one may replace it.
pub const DEFAULT_FAILURE_REPLACEMENT_SECS: u64 = 3600;

/// The failure currently shown in the health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastFailure {
    pub endpoint: String,
    pub message: Option<String>,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
}

/// Aggregated success/failure counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverallCounts {
    pub success: u64,
    pub failure: u64,
}

/// Snapshot of all recorded outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestStatistics {
    pub overall: OverallCounts,
    pub by_status_code: BTreeMap<u16, u64>,
    pub by_endpoint: BTreeMap<String, BTreeMap<u16, u64>>,
}

/// Returns true for status codes in the 2xx range.
pub fn is_success(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

#[derive(Default)]
struct Outcomes {
    counts_by_endpoint: HashMap<String, HashMap<u16, u64>>,
    last_failure: Option<LastFailure>,
}

/// Records the outcome of every tracked request.
pub struct RequestRecorder {
    outcomes: Mutex<Outcomes>,
    clock: Arc<dyn Clock>,
    replacement_window: TimeDelta,
}

impl RequestRecorder {
    /// Create a recorder whose failure slot is sticky for `replacement_window_secs`.
    pub fn new(clock: Arc<dyn Clock>, replacement_window_secs: u64) -> Self {
        let secs = i64::try_from(replacement_window_secs).unwrap_or(i64::MAX);
        Self {
            outcomes: Mutex::new(Outcomes::default()),
            clock,
            replacement_window: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Outcomes> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one response; non-2xx responses may replace the failure slot.
    pub fn record(&self, endpoint: &str, status_code: u16, message: Option<String>) {
        let now = self.clock.now();
        let mut outcomes = self.lock();

        *outcomes
            .counts_by_endpoint
            .entry(endpoint.to_string())
            .or_default()
            .entry(status_code)
            .or_insert(0) += 1;

        if is_success(status_code) {
            return;
        }

        let replace = match &outcomes.last_failure {
            None => true,
            Some(current) => now - current.timestamp > self.replacement_window,
        };
        if replace {
            outcomes.last_failure = Some(LastFailure {
                endpoint: endpoint.to_string(),
                message,
                status_code,
                timestamp: now,
            });
        }
    }

    /// Current statistics grouped by status code and by endpoint.
    pub fn statistics(&self) -> RequestStatistics {
        let counts_by_endpoint = self.lock().counts_by_endpoint.clone();

        let mut stats = RequestStatistics::default();
        for (endpoint, counts) in counts_by_endpoint {
            for (&status_code, &count) in &counts {
                *stats.by_status_code.entry(status_code).or_insert(0) += count;
                if is_success(status_code) {
                    stats.overall.success += count;
                } else {
                    stats.overall.failure += count;
                }
            }
            stats.by_endpoint.insert(endpoint, counts.into_iter().collect());
        }
        stats
    }

    /// Copy of the failure slot.
    pub fn last_failure(&self) -> Option<LastFailure> {
        self.lock().last_failure.clone()
    }

    /// Clear counters and the failure slot.
    pub fn reset(&self) {
        let mut outcomes = self.lock();
        outcomes.counts_by_endpoint.clear();
        outcomes.last_failure = None;
    }
}
