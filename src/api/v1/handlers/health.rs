/*
 * Responsibility
 * - GET /api/v1/health (liveness + whether a catalog key is configured)
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "catalog_credential": state.catalog.has_credential(),
        })),
    )
}
