//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use mindwell_types::error::AssetError;
use mindwell_types::llm::LlmError;

#[derive(Debug)]
pub enum AppError {
    SessionNotFound(Uuid),
    /// A turn is already in flight for this session.
    SessionBusy(Uuid),
    UnknownMood(String),
    MissingAsset(String),
    Backend(LlmError),
    Validation(String),
}

impl From<AssetError> for AppError {
    fn from(e: AssetError) -> Self {
        AppError::MissingAsset(e.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Backend(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session {id} not found"),
            ),
            AppError::SessionBusy(id) => (
                StatusCode::CONFLICT,
                "SESSION_BUSY",
                format!("Session {id} is still answering the previous message"),
            ),
            AppError::UnknownMood(mood) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_MOOD",
                format!("Unknown mood '{mood}'"),
            ),
            AppError::MissingAsset(msg) => (StatusCode::NOT_FOUND, "MISSING_ASSET", msg.clone()),
            AppError::Backend(e) => (StatusCode::BAD_GATEWAY, "BACKEND_UNAVAILABLE", e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
