use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{models::LeaderboardEntry, repository::leaderboard::LeaderboardRepository};

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/leaderboard",
    responses(
        (status = 200, description = "Current leaderboard, empty when unavailable", body = Vec<LeaderboardEntry>)
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(State(state): State<AppState>) -> Response {
    let entries = LeaderboardRepository::new(state.accountant.store())
        .load()
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Leaderboard unavailable: {}", e);
            Vec::new()
        });

    Json(entries).into_response()
}
