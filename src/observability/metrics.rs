//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): completed requests by route template (`unmatched` without a route), status
//! - `gateway_health_status_code` (gauge): last derived health status code
//!
//! # Design Decisions
//! - Prometheus scrape endpoint on its own listener
//! - Health requests are excluded from the counter, same as the recorder

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const HEALTH_STATUS_CODE: &str = "gateway_health_status_code";

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &str, status: u16) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_health_status(code: u8) {
    metrics::gauge!(HEALTH_STATUS_CODE).set(f64::from(code));
}
