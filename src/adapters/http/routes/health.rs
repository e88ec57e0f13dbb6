use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
}

/// GET /health
/// Liveness only; storage is not touched.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
