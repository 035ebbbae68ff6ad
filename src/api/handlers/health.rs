/*
 * Responsibility
 * - GET /health (liveness, outside the gate)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "message": "Server is running",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
