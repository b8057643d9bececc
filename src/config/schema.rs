//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::health::status::DEFAULT_FAILURE_SCORING_SECS;
use crate::tracking::DEFAULT_FAILURE_REPLACEMENT_SECS;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Health endpoint settings.
    pub health: HealthConfig,

    /// Request outcome tracking settings.
    pub tracking: TrackingConfig,

    /// ViCare cloud API settings.
    pub vicare: ViCareConfig,

    /// Loxone Miniserver settings.
    pub loxone: LoxoneConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Health endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Path of the health endpoint; requests below it are never tracked.
    pub path: String,

    /// Failures older than this many seconds do not affect the status code.
    pub failure_scoring_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
            failure_scoring_secs: DEFAULT_FAILURE_SCORING_SECS,
        }
    }
}

/// Request outcome tracking configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Seconds the stored last failure is kept before a new one may replace it.
    pub failure_replacement_secs: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            failure_replacement_secs: DEFAULT_FAILURE_REPLACEMENT_SECS,
        }
    }
}

/// ViCare cloud API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViCareConfig {
    /// OAuth client id registered with the vendor developer portal.
    pub client_id: String,

    /// Base URL of the IoT API.
    pub api_base_url: String,

    /// OAuth token endpoint used for refreshing.
    pub token_url: String,

    /// Path of the JSON token file.
    pub token_path: String,

    /// How long device features are cached, in seconds.
    pub cache_duration_secs: u64,

    /// Honor proxy settings from the environment.
    pub trust_env: bool,

    /// Timeout for a single API call in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ViCareConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            api_base_url: "https://api.viessmann.com".to_string(),
            token_url: "https://iam.viessmann.com/idp/v3/token".to_string(),
            token_path: "vicare.token".to_string(),
            cache_duration_secs: 120,
            trust_env: true,
            request_timeout_secs: 30,
        }
    }
}

/// Loxone Miniserver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoxoneConfig {
    /// Base URL of the Miniserver; empty disables the Loxone routes.
    pub url: String,

    /// Basic auth user.
    pub user: String,

    /// Basic auth password.
    pub password: String,

    /// IO identifier of the sleep mode switch.
    pub sleep_mode_io: String,

    /// Verify the Miniserver TLS certificate.
    pub verify_tls: bool,

    /// Timeout for a single request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LoxoneConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: String::new(),
            password: String::new(),
            sleep_mode_io: "1b60daf4-0071-17ba-ffffed57184a04d2".to_string(),
            verify_tls: true,
            request_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "vicare_gateway=info,tower_http=info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
