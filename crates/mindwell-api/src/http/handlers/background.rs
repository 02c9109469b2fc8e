//! GET /api/v1/background - Background image as a base64 data URL.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use mindwell_infra::assets::BackgroundAsset;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

pub async fn get_background(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BackgroundAsset>>, AppError> {
    let start = Instant::now();
    let path = state
        .config
        .assets
        .background_image
        .as_deref()
        .ok_or_else(|| AppError::MissingAsset("No background image configured".to_string()))?;

    let asset = BackgroundAsset::load(path).await.inspect_err(|e| {
        tracing::warn!("Background image unavailable: {e}");
    })?;
    Ok(Json(ApiResponse::success(asset, start)))
}
