//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// Basic health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Liveness probe: the process is up and serving
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: dependencies are reachable
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::error!("readiness check failed: {:?}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
