//! Loxone Miniserver HTTP client.
//!
//! # Responsibilities
//! - Read virtual IO states via `/dev/sps/io/{io}` with basic auth
//! - Extract the embedded `Code` and `value` attributes of the answer
//!
//! The Miniserver answers with HTTP 200 and reports the real outcome in the
//! `Code` attribute, e.g. `<LL control="..." value="1" Code="200"/>`.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

use crate::config::LoxoneConfig;

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Code="(\d+)""#).expect("valid code pattern"));
static VALUE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"value="([^"]*)""#).expect("valid value pattern"));

/// Errors that can occur while talking to the Miniserver.
#[derive(Debug, Error)]
pub enum LoxoneError {
    /// No Miniserver URL configured.
    #[error("Loxone Miniserver is not configured")]
    NotConfigured,

    /// The Miniserver reported a non-200 code.
    #[error("Loxone answered with HTTP {0}")]
    Status(u16),

    /// Connection or protocol failure.
    #[error("Loxone request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Parsed answer of an IO request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoState {
    pub code: Option<u16>,
    pub value: Option<String>,
}

impl IoState {
    pub fn parse(text: &str) -> Self {
        Self {
            code: CODE_PATTERN
                .captures(text)
                .and_then(|c| c[1].parse().ok()),
            value: VALUE_PATTERN.captures(text).map(|c| c[1].to_string()),
        }
    }

    pub fn is_on(&self) -> bool {
        self.value.as_deref() == Some("1")
    }
}

/// Client for a single Miniserver.
pub struct LoxoneClient {
    http: reqwest::Client,
    config: LoxoneConfig,
}

impl LoxoneClient {
    pub fn new(config: LoxoneConfig) -> Result<Self, LoxoneError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;
        Ok(Self { http, config })
    }

    /// Read an IO and fail on any `Code` other than 200.
    pub async fn read_io(&self, io: &str) -> Result<IoState, LoxoneError> {
        if self.config.url.is_empty() {
            return Err(LoxoneError::NotConfigured);
        }
        let url = format!("{}/dev/sps/io/{}", self.config.url.trim_end_matches('/'), io);

        let text = self
            .http
            .get(&url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .send()
            .await?
            .text()
            .await?;

        let state = IoState::parse(&text);
        match state.code {
            Some(code) if code != 200 => {
                tracing::warn!(io, code, "Loxone rejected IO request");
                Err(LoxoneError::Status(code))
            }
            _ => Ok(state),
        }
    }

    /// Whether the sleep mode switch is on.
    pub async fn sleep_mode(&self) -> Result<bool, LoxoneError> {
        let state = self.read_io(&self.config.sleep_mode_io).await?;
        Ok(state.is_on())
    }
}
