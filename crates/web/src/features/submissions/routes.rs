use axum::{Router, middleware, routing::post};

use super::handlers::reverify_submission;
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/:team_id/:bug_id", post(reverify_submission))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
