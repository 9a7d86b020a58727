use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::relay::RelayError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized"),
            AppError::Relay(RelayError::NotReady(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NOT_READY",
                "Relay is not ready",
            ),
            AppError::Relay(RelayError::Portal(_)) => (
                StatusCode::BAD_GATEWAY,
                "PORTAL_ERROR",
                "Portal API unavailable",
            ),
            AppError::Relay(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_CHATBOT_SETTINGS",
                "Invalid chatbot settings",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, generic_message) = self.parts();
        let log_message = self.to_string();
        let client_message = match &self {
            AppError::Auth(msg) => msg.clone(),
            _ if is_production() => generic_message.to_string(),
            _ => log_message.clone(),
        };

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %log_message,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
