//! Application Error Types
//!
//! Every failure the proxy surface can produce, and how it is rendered to
//! the browser. Upstream details are logged, never forwarded.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The upstream request could not complete (connect, timeout, reset).
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The upstream answered with a non-2xx status.
    #[error("Upstream responded with status {status}")]
    UpstreamStatus { status: u16, body: String },

    /// The upstream body is not JSON or lacks the required shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Locally rejected input (bad page, bad id).
    #[error("{0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AppError::NetworkFailure(_)
            | AppError::UpstreamStatus { .. }
            | AppError::MalformedResponse(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to show to the browser.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidParameter(msg) => msg.clone(),
            AppError::NetworkFailure(_) => "Failed to reach product service".to_string(),
            AppError::UpstreamStatus { status, .. } => {
                format!("Product service responded with status: {status}")
            }
            AppError::MalformedResponse(_) => "Invalid API response structure".to_string(),
            AppError::Config(_) => "Service misconfigured".to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::MalformedResponse(e.to_string())
        } else {
            AppError::NetworkFailure(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedResponse(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::UpstreamStatus { status, body } => {
                error!(upstream_status = status, body = %body, "Upstream error response");
            }
            AppError::InvalidParameter(msg) => {
                tracing::warn!("Rejected request: {msg}");
            }
            other => error!("{other}"),
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_maps_to_bad_request() {
        let err = AppError::InvalidParameter("Invalid page parameter".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Invalid page parameter");
    }

    #[test]
    fn upstream_body_is_not_exposed() {
        let err = AppError::UpstreamStatus {
            status: 503,
            body: "<html>stack trace</html>".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("stack trace"));
        assert!(err.public_message().contains("503"));
    }

    #[test]
    fn json_errors_are_malformed_responses() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{{").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
