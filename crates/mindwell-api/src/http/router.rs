//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`, plus an unversioned `/health`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/sessions/{id}/turns", get(handlers::session::get_turns))
        .route("/sessions/{id}/messages", post(handlers::chat::send_message))
        .route("/moods", get(handlers::wellness::list_moods))
        .route("/moods/{mood}", get(handlers::wellness::get_mood))
        .route("/quick-prompts", get(handlers::wellness::list_quick_prompts))
        .route("/sentiment", post(handlers::wellness::score_sentiment))
        .route("/background", get(handlers::background::get_background))
        .route("/backend", get(handlers::backend::check_backend));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
