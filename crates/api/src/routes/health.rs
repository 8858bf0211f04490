use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET / -- service banner, no dependencies touched.
async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Project Manager API",
    })
}

/// GET /health -- 200 when the database answers, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    match pm_db::health_check(&state.pool).await {
        Ok(()) => Ok(Json(HealthResponse { status: "healthy" })),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            Err(AppError::Unavailable("unhealthy".to_string()))
        }
    }
}

/// Mount root-level routes (NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}
