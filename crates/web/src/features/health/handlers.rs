use axum::{Json, extract::State};
use storage::dto::health::{DatabaseStatus, HealthResponse};

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match state.accountant.database() {
        Some(db) => db.ping().await.is_ok(),
        None => false,
    };
    let mongodb = if connected {
        DatabaseStatus::Connected
    } else {
        DatabaseStatus::Disconnected
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "GitHub Hackathon Tracker".to_string(),
        mongodb,
    })
}
