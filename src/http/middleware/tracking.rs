//! Request outcome tracking middleware.
//! Records every completed exchange outside the health endpoint.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::error::FailureMessage;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Message recorded for failures without a readable plain-text body.
pub const UNKNOWN_FAILURE_MESSAGE: &str = "n/a";

/// Metric label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Failure message for a response; `None` below 400.
///
/// Only bodies produced by `ApiError` count as plain text here: their text is
/// carried in the [`FailureMessage`] extension. Framework responses (fallback
/// 404, extractor rejections) yield [`UNKNOWN_FAILURE_MESSAGE`].
pub fn failure_message(response: &Response) -> Option<String> {
    if response.status().as_u16() < 400 {
        return None;
    }
    Some(
        response
            .extensions()
            .get::<FailureMessage>()
            .map(|m| m.0.clone())
            .unwrap_or_else(|| UNKNOWN_FAILURE_MESSAGE.to_string()),
    )
}

/// Bounded metric label: the route template, never the raw path.
pub fn metric_endpoint(matched: Option<&MatchedPath>) -> String {
    matched
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

pub async fn track_outcome(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let route = metric_endpoint(request.extensions().get::<MatchedPath>());
    let response = next.run(request).await;

    if !path.starts_with(state.config.health.path.as_str()) {
        let status = response.status().as_u16();
        state.recorder.record(&path, status, failure_message(&response));
        metrics::record_request(&route, status);
    }

    response
}
