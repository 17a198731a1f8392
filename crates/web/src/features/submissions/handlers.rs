use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{dto::verification::ReverifyResponse, error::StorageError};

use crate::error::WebError;
use crate::state::AppState;

use super::services::{self, Reverification};

#[utoipa::path(
    post,
    path = "/verify/{team_id}/{bug_id}",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("bug_id" = u32, Path, description = "Bug number")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Submission re-verified", body = ReverifyResponse),
        (status = 400, description = "No code changes or bug description available"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Bug submission not found")
    ),
    tag = "submissions"
)]
pub async fn reverify_submission(
    State(state): State<AppState>,
    Path((team_id, bug_id)): Path<(String, u32)>,
) -> Result<Response, WebError> {
    let outcome = services::reverify(&state, &team_id, bug_id)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => WebError::NotFound("Bug submission not found".to_string()),
            other => WebError::Storage(other),
        })?;

    let submission = match outcome {
        Reverification::Done(submission) => submission,
        Reverification::MissingEvidence => {
            return Err(WebError::BadRequest(
                "No code changes or bug description available".to_string(),
            ));
        }
    };

    Ok(Json(ReverifyResponse {
        verified: submission.verified,
        llm_response: submission.llm_verification,
        method: submission.verification_method,
        message: format!("Bug #{} re-verified successfully", bug_id),
    })
    .into_response())
}
