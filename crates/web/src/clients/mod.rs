//! Outbound side effects of the tracker, each behind a trait so handlers
//! can be exercised without git, the GitHub CLI or a running gateway.

pub mod diff;
pub mod git;
pub mod github;
pub mod verifier;

use async_trait::async_trait;
use storage::models::{BugDescription, FileChange, VerificationMethod};

pub use git::GitCli;
pub use github::GhCli;
pub use verifier::GatewayClient;

/// Where commit diffs come from
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Structured changes of `commit_hash`, `None` when they cannot be
    /// extracted.
    async fn code_changes(&self, full_repo_name: &str, commit_hash: &str)
    -> Option<Vec<FileChange>>;
}

/// Issue-side effects on the team repository
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Points from the difficulty label of issue `bug_id`; 0 when unknown.
    async fn label_points(&self, full_repo_name: &str, bug_id: u32) -> u32;

    /// Reopen the issue labelled `bug-<bug_id>`. Returns whether it is open
    /// afterwards.
    async fn reopen_bug(&self, full_repo_name: &str, bug_id: u32, reason: &str) -> bool;
}

/// Raw gateway answer plus the method tag it reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayVerdict {
    pub response: String,
    pub method: VerificationMethod,
}

impl GatewayVerdict {
    /// What a failed gateway call is recorded as
    pub fn failed() -> Self {
        Self {
            response: "{}".to_string(),
            method: VerificationMethod::Error,
        }
    }
}

#[async_trait]
pub trait VerificationBackend: Send + Sync {
    async fn verify(&self, changes: &[FileChange], bug: &BugDescription) -> GatewayVerdict;
}
