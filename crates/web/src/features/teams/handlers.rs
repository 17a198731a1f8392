use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::{keys::validate_team_id, models::Progress, repository::progress::ProgressRepository};
use validator::{Validate, ValidationError};

use crate::error::WebError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct TeamPath {
    #[validate(custom(function = "team_id_is_valid"))]
    pub team_id: String,
}

fn team_id_is_valid(team_id: &str) -> Result<(), ValidationError> {
    validate_team_id(team_id).map_err(|_| ValidationError::new("invalid_team_id"))
}

#[utoipa::path(
    get,
    path = "/team/{team_id}",
    params(
        ("team_id" = String, Path, description = "Team identifier")
    ),
    responses(
        (status = 200, description = "Team progress", body = Progress),
        (status = 400, description = "Invalid team id"),
        (status = 404, description = "Team not found")
    ),
    tag = "teams"
)]
pub async fn get_team_progress(
    State(state): State<AppState>,
    Path(path): Path<TeamPath>,
) -> Result<Response, WebError> {
    path.validate()?;

    let progress = ProgressRepository::new(state.accountant.store())
        .find(&path.team_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                WebError::NotFound("Team not found".to_string())
            } else {
                WebError::Storage(e)
            }
        })?;

    Ok(Json(progress).into_response())
}
