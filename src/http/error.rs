//! Mapping of handler errors to HTTP responses.
//!
//! Error responses carry a plain-text body. The same text is attached as a
//! [`FailureMessage`] response extension so the tracking middleware can read
//! it without buffering the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::loxone::LoxoneError;
use crate::vendor::VendorError;

/// Plain-text failure message attached to error responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMessage(pub String);

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request is well-formed but cannot be served (device selection, ranges).
    #[error("{0}")]
    Unprocessable(String),

    /// Unknown path parameter value.
    #[error("{0}")]
    NotFound(String),

    /// Operation not permitted for the given program or level.
    #[error("{0}")]
    NotAllowed(String),

    #[error(transparent)]
    Vendor(#[from] VendorError),

    #[error(transparent)]
    Loxone(#[from] LoxoneError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Vendor(e) => match e {
                VendorError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
                VendorError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                VendorError::InvalidConfiguration(_) => StatusCode::FAILED_DEPENDENCY,
                VendorError::NotSupported(_)
                | VendorError::CommandFailed(_)
                | VendorError::InvalidData { .. } => StatusCode::METHOD_NOT_ALLOWED,
                VendorError::Api { .. } | VendorError::Transport(_) | VendorError::TokenStorage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Loxone(e) => match e {
                LoxoneError::NotConfigured => StatusCode::FAILED_DEPENDENCY,
                LoxoneError::Status(code) => {
                    StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                LoxoneError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(FailureMessage(message));
        response
    }
}
