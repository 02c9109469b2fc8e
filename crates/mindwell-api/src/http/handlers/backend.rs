//! GET /api/v1/backend - Configured backend and whether it can serve the model.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BackendStatus {
    pub provider: String,
    pub model: String,
    pub max_tokens: u32,
    pub check_ms: u64,
}

pub async fn check_backend(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BackendStatus>>, AppError> {
    let start = Instant::now();
    state.provider.check().await?;

    let status = BackendStatus {
        provider: state.provider.name().to_string(),
        model: state.provider.model().to_string(),
        max_tokens: state.config.backend.max_tokens,
        check_ms: start.elapsed().as_millis() as u64,
    };
    Ok(Json(ApiResponse::success(status, start)))
}
