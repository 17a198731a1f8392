use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use storage::{
    dto::webhook::{IgnoredResponse, ProcessedResponse},
    keys::validate_team_id,
};

use crate::error::WebError;
use crate::features::submissions::services::{BugFixClaim, record_bug_fix};
use crate::state::AppState;

use super::services::{PayloadError, PushEvent, RepoName, extract_bug_id, parse_payload, parse_repo_name};

const EVENT_HEADER: &str = "X-GitHub-Event";

#[utoipa::path(
    post,
    path = "/webhook/github",
    request_body(content = String, description = "GitHub push event as JSON or form-encoded `payload`"),
    params(
        ("X-GitHub-Event" = String, Header, description = "GitHub event name; only `push` is processed")
    ),
    responses(
        (status = 200, description = "Push processed or event ignored", body = ProcessedResponse),
        (status = 400, description = "Invalid, empty or non-team payload")
    ),
    tag = "webhook"
)]
pub async fn handle_github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebError> {
    let event = headers
        .get(EVENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if event != "push" {
        return Ok(Json(IgnoredResponse::new("not a push event")).into_response());
    }

    let payload = parse_payload(&body).map_err(|e| match e {
        PayloadError::Empty => WebError::BadRequest("Empty payload".to_string()),
        PayloadError::Invalid => WebError::BadRequest("Invalid payload".to_string()),
    })?;

    let push: PushEvent = serde_json::from_value(payload).map_err(|e| {
        tracing::error!("Unreadable push event: {}", e);
        WebError::BadRequest("Invalid payload".to_string())
    })?;

    let Some(repo_name) = push.repository.name.clone() else {
        tracing::error!("No repository name in payload");
        return Err(WebError::BadRequest("No repository name".to_string()));
    };

    let team_repo = match parse_repo_name(&repo_name) {
        RepoName::Team(team_repo) => team_repo,
        RepoName::NotTeamRepo => {
            return Ok(Json(IgnoredResponse::new("not a team repo")).into_response());
        }
        RepoName::Malformed => {
            return Err(WebError::BadRequest("Invalid team repo name format".to_string()));
        }
    };
    validate_team_id(&team_repo.team_id)?;

    let full_repo_name = push.repository.full_name.clone().unwrap_or(repo_name);

    let mut processed = 0;
    for commit in push.commits {
        let Some(bug_id) = extract_bug_id(&commit.message) else {
            continue;
        };

        record_bug_fix(
            &state,
            BugFixClaim {
                team_id: team_repo.team_id.clone(),
                domain: team_repo.domain.clone(),
                full_repo_name: full_repo_name.clone(),
                commit_hash: commit.id,
                commit_message: commit.message,
                bug_id,
            },
        )
        .await?;
        processed += 1;
    }

    tracing::info!(
        "Processed {} bug-fix commit(s) from {}",
        processed,
        full_repo_name
    );

    Ok(Json(ProcessedResponse::new(team_repo.team_id, processed)).into_response())
}
