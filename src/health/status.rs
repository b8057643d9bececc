//! Numeric health status derivation.
//!
//! # Status Codes
//! ```text
//! 1  online (no failure, or last failure older than the scoring window)
//! 2  invalid authentication token
//! 3  authentication error (401)
//! 4  rate limit error (429)
//! 5  invalid configuration error (424)
//! 6  not supported / invalid data / command error (405)
//! 7  internal server error (500)
//! 8  uncategorized error
//! 9-10 reserved
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::tracking::LastFailure;

/// Seconds after which a failure no longer affects the status code.
pub const DEFAULT_FAILURE_SCORING_SECS: u64 = 15 * 60;

pub const STATUS_ONLINE: u8 = 1;
pub const STATUS_INVALID_TOKEN: u8 = 2;
pub const STATUS_UNAUTHORIZED: u8 = 3;
pub const STATUS_RATE_LIMITED: u8 = 4;
pub const STATUS_INVALID_CONFIGURATION: u8 = 5;
pub const STATUS_NOT_SUPPORTED: u8 = 6;
pub const STATUS_INTERNAL_ERROR: u8 = 7;
pub const STATUS_UNCATEGORIZED: u8 = 8;

/// State of the vendor OAuth token as shown in the health report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthTokenStatus {
    Invalid,
    Expired,
    Valid,
}

/// Derive the status code from the token state and the last recorded failure.
///
/// Failures older than `scoring_window_secs` are ignored here, while the
/// report still shows them verbatim.
pub fn derive_status_code(
    auth_token: AuthTokenStatus,
    last_failure: Option<&LastFailure>,
    now: DateTime<Utc>,
    scoring_window_secs: u64,
) -> u8 {
    if auth_token == AuthTokenStatus::Invalid {
        return STATUS_INVALID_TOKEN;
    }
    let Some(failure) = last_failure else {
        return STATUS_ONLINE;
    };

    let window = i64::try_from(scoring_window_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);
    if now - failure.timestamp > window {
        return STATUS_ONLINE;
    }

    match failure.status_code {
        401 => STATUS_UNAUTHORIZED,
        429 => STATUS_RATE_LIMITED,
        424 => STATUS_INVALID_CONFIGURATION,
        405 => STATUS_NOT_SUPPORTED,
        500 => STATUS_INTERNAL_ERROR,
        _ => STATUS_UNCATEGORIZED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::UNIX_EPOCH + TimeDelta::days(20_000)
    }

    fn failure(status_code: u16, age_secs: i64) -> LastFailure {
        LastFailure {
            endpoint: "/heatpump/temperature".into(),
            message: Some("boom".into()),
            status_code,
            timestamp: now() - TimeDelta::seconds(age_secs),
        }
    }

    fn derive(auth: AuthTokenStatus, last_failure: Option<&LastFailure>) -> u8 {
        derive_status_code(auth, last_failure, now(), DEFAULT_FAILURE_SCORING_SECS)
    }

    #[test]
    fn test_invalid_token_overrides_failures() {
        assert_eq!(derive(AuthTokenStatus::Invalid, Some(&failure(500, 0))), 2);
        assert_eq!(derive(AuthTokenStatus::Invalid, None), 2);
    }

    #[test]
    fn test_no_failure_is_online() {
        assert_eq!(derive(AuthTokenStatus::Valid, None), 1);
        assert_eq!(derive(AuthTokenStatus::Expired, None), 1);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [(401, 3), (429, 4), (424, 5), (405, 6), (500, 7), (404, 8), (503, 8), (302, 8)];
        for (status_code, expected) in cases {
            assert_eq!(
                derive(AuthTokenStatus::Valid, Some(&failure(status_code, 60))),
                expected,
                "status {}",
                status_code
            );
        }
    }

    #[test]
    fn test_rate_limit_five_minutes_ago() {
        assert_eq!(derive(AuthTokenStatus::Valid, Some(&failure(429, 5 * 60))), 4);
    }

    #[test]
    fn test_scoring_window_boundary() {
        assert_eq!(derive(AuthTokenStatus::Valid, Some(&failure(500, 899))), 7);
        assert_eq!(derive(AuthTokenStatus::Valid, Some(&failure(500, 900))), 7);
        assert_eq!(derive(AuthTokenStatus::Valid, Some(&failure(500, 901))), 1);
    }

    #[test]
    fn test_expired_token_still_scores_failures() {
        assert_eq!(derive(AuthTokenStatus::Expired, Some(&failure(401, 10))), 3);
    }

    #[test]
    fn test_auth_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AuthTokenStatus::Expired).unwrap(), "\"expired\"");
    }
}
