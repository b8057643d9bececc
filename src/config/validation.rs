//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts and windows > 0)
//! - Check URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("health path '{0}' must start with '/' and not end with '/'")]
    HealthPath(String),

    #[error("{field} is not a valid URL: '{value}'")]
    Url { field: &'static str, value: String },

    #[error("unknown log format '{0}' (expected 'pretty' or 'json')")]
    LogFormat(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let positive = [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("health.failure_scoring_secs", config.health.failure_scoring_secs),
        ("tracking.failure_replacement_secs", config.tracking.failure_replacement_secs),
        ("vicare.request_timeout_secs", config.vicare.request_timeout_secs),
        ("loxone.request_timeout_secs", config.loxone.request_timeout_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    let path = &config.health.path;
    if !path.starts_with('/') || path.len() < 2 || path.ends_with('/') {
        errors.push(ValidationError::HealthPath(path.clone()));
    }

    let mut urls = vec![
        ("vicare.api_base_url", &config.vicare.api_base_url),
        ("vicare.token_url", &config.vicare.token_url),
    ];
    if !config.loxone.url.is_empty() {
        urls.push(("loxone.url", &config.loxone.url));
    }
    for (field, value) in urls {
        if Url::parse(value).is_err() {
            errors.push(ValidationError::Url {
                field,
                value: value.clone(),
            });
        }
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::LogFormat(config.observability.log_format.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
