use axum::{Router, routing::post};

use super::handlers::handle_github_webhook;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/github", post(handle_github_webhook))
}
