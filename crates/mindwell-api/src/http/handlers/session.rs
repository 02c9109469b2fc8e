//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions            - Open a session
//! - GET    /api/v1/sessions/{id}       - Session summary
//! - GET    /api/v1/sessions/{id}/turns - Recorded turns (`?tail=n`)
//! - DELETE /api/v1/sessions/{id}       - Close a session
//!
//! Reads wait for an in-flight turn to finish rather than failing.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use mindwell_core::chat::session::SessionSummary;
use mindwell_types::chat::Turn;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::{AppState, SharedSession};

#[derive(Debug, Deserialize)]
pub struct TurnsQuery {
    /// Only the most recent `tail` turns. All turns when absent.
    pub tail: Option<usize>,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

pub(crate) fn find_session(state: &AppState, id: &str) -> Result<(Uuid, SharedSession), AppError> {
    let id = parse_uuid(id)?;
    let session = state.session(&id).ok_or(AppError::SessionNotFound(id))?;
    Ok((id, session))
}

/// POST /api/v1/sessions - Open a session.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SessionSummary>>) {
    let start = Instant::now();
    let (id, session) = state.open_session();
    let summary = session.lock().await.summary();

    let response = ApiResponse::success(summary, start)
        .with_link("self", &format!("/api/v1/sessions/{id}"))
        .with_link("messages", &format!("/api/v1/sessions/{id}/messages"));
    (StatusCode::CREATED, Json(response))
}

/// GET /api/v1/sessions/{id} - Session summary.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionSummary>>, AppError> {
    let start = Instant::now();
    let (id, session) = find_session(&state, &id)?;
    let summary = session.lock().await.summary();

    Ok(Json(
        ApiResponse::success(summary, start)
            .with_link("self", &format!("/api/v1/sessions/{id}"))
            .with_link("turns", &format!("/api/v1/sessions/{id}/turns")),
    ))
}

/// GET /api/v1/sessions/{id}/turns - Recorded turns, oldest first.
pub async fn get_turns(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TurnsQuery>,
) -> Result<Json<ApiResponse<Vec<Turn>>>, AppError> {
    let start = Instant::now();
    let (_, session) = find_session(&state, &id)?;
    let session = session.lock().await;

    let turns = match query.tail {
        Some(n) => session.store().tail(n).to_vec(),
        None => session.store().turns().to_vec(),
    };
    Ok(Json(ApiResponse::success(turns, start)))
}

/// DELETE /api/v1/sessions/{id} - Close a session.
///
/// The session is unregistered first, so no new turn can start. A turn
/// already in flight runs to completion before the summary is taken.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionSummary>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    let (_, session) = state
        .sessions
        .remove(&id)
        .ok_or(AppError::SessionNotFound(id))?;

    // Wait out any in-flight turn.
    drop(session.lock().await);

    let summary = match Arc::try_unwrap(session) {
        Ok(mutex) => mutex.into_inner().close(),
        // The turn task still holds its handle; report without consuming.
        Err(shared) => shared.lock().await.summary(),
    };
    Ok(Json(ApiResponse::success(summary, start)))
}
