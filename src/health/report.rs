//! Health report assembly and the `/health` handler.

use axum::{extract::State, Json};
use chrono::SecondsFormat;
use serde::Serialize;

use crate::health::status::{derive_status_code, AuthTokenStatus};
use crate::health::uptime::format_uptime;
use crate::http::AppState;
use crate::observability::metrics;
use crate::tracking::{LastFailure, RequestStatistics};
use crate::vendor::TokenState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub status_code: u8,
    pub uptime: String,
    pub checks: HealthChecks,
    pub requests: RequestsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub auth_token: AuthTokenStatus,
    pub no_of_installations: usize,
    pub session_available: bool,
    pub trust_env: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestsReport {
    pub request_stats: RequestStatistics,
    pub last_failure_message: Option<LastFailureReport>,
}

/// Last failure with its timestamp rendered as RFC 3339.
#[derive(Debug, Clone, Serialize)]
pub struct LastFailureReport {
    pub endpoint: String,
    pub message: Option<String>,
    pub status_code: u16,
    pub timestamp: String,
}

impl From<&LastFailure> for LastFailureReport {
    fn from(failure: &LastFailure) -> Self {
        Self {
            endpoint: failure.endpoint.clone(),
            message: failure.message.clone(),
            status_code: failure.status_code,
            timestamp: failure.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

impl From<TokenState> for AuthTokenStatus {
    fn from(state: TokenState) -> Self {
        match state {
            TokenState::Absent => AuthTokenStatus::Invalid,
            TokenState::Expired => AuthTokenStatus::Expired,
            TokenState::Valid => AuthTokenStatus::Valid,
        }
    }
}

/// Build the report from live state.
pub fn build_report(state: &AppState) -> HealthReport {
    let now = state.clock.now();
    let auth_token = AuthTokenStatus::from(state.vendor.token_state());
    let last_failure = state.recorder.last_failure();
    let status_code = derive_status_code(
        auth_token,
        last_failure.as_ref(),
        now,
        state.config.health.failure_scoring_secs,
    );

    HealthReport {
        status: "UP",
        status_code,
        uptime: format_uptime(now - state.started_at),
        checks: HealthChecks {
            auth_token,
            no_of_installations: state.vendor.installation_count(),
            session_available: state.vendor.session_available(),
            trust_env: state.vendor.trust_env(),
        },
        requests: RequestsReport {
            request_stats: state.recorder.statistics(),
            last_failure_message: last_failure.as_ref().map(LastFailureReport::from),
        },
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    let report = build_report(&state);
    metrics::record_health_status(report.status_code);
    tracing::debug!(status_code = report.status_code, "Health report served");
    Json(report)
}
