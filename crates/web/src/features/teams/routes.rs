use axum::{Router, routing::get};

use super::handlers::get_team_progress;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/:team_id", get(get_team_progress))
}
