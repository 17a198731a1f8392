use chrono::Utc;
use storage::{
    error::{Result, StorageError},
    models::{BugDescription, Submission, SubmissionStatus, VerificationMethod, bug_key},
    repository::{bug::BugRepository, submission::SubmissionRepository},
};
use verifier::is_fixed;

use crate::config::PointsPolicy;
use crate::state::AppState;

/// A pushed commit that claims to fix a bug
#[derive(Debug, Clone)]
pub struct BugFixClaim {
    pub team_id: String,
    pub domain: String,
    pub full_repo_name: String,
    pub commit_hash: String,
    pub commit_message: String,
    pub bug_id: u32,
}

/// What a re-verification changed
#[derive(Debug, Clone)]
pub enum Reverification {
    Done(Submission),
    /// Nothing to verify against
    MissingEvidence,
}

pub async fn bug_points(state: &AppState, full_repo_name: Option<&str>, bug_id: u32) -> Option<u32> {
    match state.points_policy {
        PointsPolicy::Fixed(points) => Some(points),
        PointsPolicy::Labels => match full_repo_name {
            Some(repo) => Some(state.issues.label_points(repo, bug_id).await),
            None => None,
        },
    }
}

async fn find_bug(state: &AppState, domain: &str, bug_id: u32) -> Option<BugDescription> {
    match BugRepository::new(&state.domains_dir).find(domain, bug_id).await {
        Ok(bug) => Some(bug),
        Err(StorageError::NotFound) => {
            tracing::error!("No bug description found for bug #{} in domain {}", bug_id, domain);
            None
        }
        Err(e) => {
            tracing::error!("Failed to load bug description for bug #{}: {}", bug_id, e);
            None
        }
    }
}

async fn reopen(state: &AppState, full_repo_name: &str, bug_id: u32, reason: &str) {
    if state.reopen_on_failure {
        state.issues.reopen_bug(full_repo_name, bug_id, reason).await;
    }
}

/// Extract, verify and record one bug-fix claim.
pub async fn record_bug_fix(state: &AppState, claim: BugFixClaim) -> Result<Submission> {
    let points = bug_points(state, Some(claim.full_repo_name.as_str()), claim.bug_id)
        .await
        .unwrap_or_default();

    tracing::info!("Extracting code changes for bug #{}", claim.bug_id);
    let code_changes = state
        .diffs
        .code_changes(&claim.full_repo_name, &claim.commit_hash)
        .await;
    let bug = find_bug(state, &claim.domain, claim.bug_id).await;

    let mut submission = Submission {
        team_id: claim.team_id,
        bug_id: claim.bug_id,
        domain: claim.domain,
        commit_hash: claim.commit_hash,
        commit_message: claim.commit_message,
        repository: Some(claim.full_repo_name.clone()),
        submission_time: Utc::now(),
        status: SubmissionStatus::Submitted,
        verified: false,
        points: 0,
        code_changes,
        llm_verification: "pending".to_string(),
        llm_verified: false,
        verification_method: VerificationMethod::None,
    };

    let verdict = match (&submission.code_changes, &bug) {
        (Some(changes), Some(bug)) if !changes.is_empty() => {
            Some(state.verifier.verify(changes, bug).await)
        }
        _ => None,
    };

    match verdict {
        Some(verdict) => {
            let verified = is_fixed(&verdict.response, &bug_key(claim.bug_id));

            if verified {
                tracing::info!(
                    "Team {} bug #{} verified ({})",
                    submission.team_id,
                    claim.bug_id,
                    verdict.method
                );
            } else {
                tracing::info!(
                    "Team {} bug #{} rejected ({})",
                    submission.team_id,
                    claim.bug_id,
                    verdict.method
                );
                reopen(state, &claim.full_repo_name, claim.bug_id, verdict.method.as_str()).await;
            }

            submission.apply_verdict(verified, points, verdict.response, verdict.method);
        }
        None => {
            if !submission.has_code_changes() {
                tracing::error!("No code changes extracted for bug #{}", claim.bug_id);
                reopen(state, &claim.full_repo_name, claim.bug_id, "no code changes").await;
            }
            if bug.is_none() {
                reopen(state, &claim.full_repo_name, claim.bug_id, "no bug description").await;
            }
        }
    }

    state.accountant.record(&submission).await?;

    tracing::info!(
        "{} -> bug #{} ({} pts) verified: {}",
        submission.team_id,
        submission.bug_id,
        submission.points,
        submission.verified
    );

    Ok(submission)
}

/// Re-run verification for a stored submission and record the new verdict.
pub async fn reverify(state: &AppState, team_id: &str, bug_id: u32) -> Result<Reverification> {
    let mut submission = SubmissionRepository::new(state.accountant.store())
        .find(team_id, bug_id)
        .await?;

    let bug = find_bug(state, &submission.domain, bug_id).await;
    let (Some(changes), Some(bug)) = (submission.code_changes.clone(), bug) else {
        return Ok(Reverification::MissingEvidence);
    };
    if changes.is_empty() {
        return Ok(Reverification::MissingEvidence);
    }

    let verdict = state.verifier.verify(&changes, &bug).await;
    let verified = is_fixed(&verdict.response, &bug_key(bug_id));

    let points = if verified {
        match bug_points(state, submission.repository.as_deref(), bug_id).await {
            Some(points) => points,
            None => {
                tracing::warn!(
                    "No repository recorded for team {} bug #{}, keeping stored points",
                    team_id,
                    bug_id
                );
                submission.points
            }
        }
    } else {
        0
    };

    submission.apply_verdict(verified, points, verdict.response, verdict.method);
    state.accountant.record(&submission).await?;

    Ok(Reverification::Done(submission))
}
