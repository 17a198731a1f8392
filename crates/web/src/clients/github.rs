use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::IssueTracker;
use super::git::run;

const GH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IssueLabels {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct IssueSummary {
    number: u64,
    #[serde(default)]
    title: String,
    state: String,
}

/// Points for a set of issue labels; the easiest difficulty label wins.
pub fn points_for_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> u32 {
    let labels: Vec<String> = labels.into_iter().map(str::to_lowercase).collect();
    let has = |label: &str| labels.iter().any(|l| l == label);

    if has("difficulty-easy") {
        5
    } else if has("difficulty-medium") {
        10
    } else if has("difficulty-hard") {
        15
    } else {
        0
    }
}

fn reopen_comment(reason: &str) -> String {
    format!(
        "Bug verification failed. Reopening for another attempt.\n\n\
         **Verification Status:** Failed ({})\n\
         **Action:** Issue reopened automatically for retry",
        reason
    )
}

/// GitHub side effects through the `gh` CLI
#[derive(Default)]
pub struct GhCli;

impl GhCli {
    pub fn new() -> Self {
        Self
    }

    async fn fetch_label_points(&self, full_repo_name: &str, bug_id: u32) -> Result<u32> {
        let issue_number = bug_id.to_string();
        let mut command = Command::new("gh");
        command.args(["issue", "view", issue_number.as_str(), "-R", full_repo_name, "--json", "labels"]);

        let output = run(command, GH_TIMEOUT).await?;
        let issue: IssueLabels =
            serde_json::from_slice(&output.stdout).context("Unexpected gh issue view output")?;

        Ok(points_for_labels(issue.labels.iter().map(|l| l.name.as_str())))
    }

    async fn find_bug_issue(&self, full_repo_name: &str, bug_id: u32) -> Result<Option<IssueSummary>> {
        let label = format!("bug-{}", bug_id);
        let mut command = Command::new("gh");
        command.args([
            "issue",
            "list",
            "-R",
            full_repo_name,
            "--state",
            "all",
            "--label",
            label.as_str(),
            "--json",
            "number,title,state",
            "--limit",
            "1",
        ]);

        let output = run(command, GH_TIMEOUT).await?;
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let issues: Vec<IssueSummary> =
            serde_json::from_slice(&output.stdout).context("Unexpected gh issue list output")?;
        Ok(issues.into_iter().next())
    }

    async fn reopen(&self, full_repo_name: &str, bug_id: u32, reason: &str) -> Result<bool> {
        let Some(issue) = self.find_bug_issue(full_repo_name, bug_id).await? else {
            tracing::warn!("No issue found with label bug-{} in {}", bug_id, full_repo_name);
            return Ok(false);
        };

        tracing::info!("Found issue #{} ({}) in state {}", issue.number, issue.title, issue.state);
        if issue.state.eq_ignore_ascii_case("open") {
            tracing::info!("Bug #{} issue #{} is already open", bug_id, issue.number);
            return Ok(true);
        }

        let issue_number = issue.number.to_string();
        let comment = reopen_comment(reason);
        let mut command = Command::new("gh");
        command.args([
            "issue",
            "reopen",
            issue_number.as_str(),
            "-R",
            full_repo_name,
            "--comment",
            comment.as_str(),
        ]);

        if let Err(e) = run(command, GH_TIMEOUT).await {
            if e.to_string().to_lowercase().contains("permission") {
                tracing::warn!(
                    "No permission to reopen issues in {}; reopen issue #{} for bug #{} manually",
                    full_repo_name,
                    issue.number,
                    bug_id
                );
            } else {
                tracing::warn!("Failed to reopen issue #{}: {:#}", issue.number, e);
            }
            return Ok(false);
        }

        tracing::info!("Reopened issue #{} for bug #{}", issue.number, bug_id);
        Ok(true)
    }
}

#[async_trait]
impl IssueTracker for GhCli {
    async fn label_points(&self, full_repo_name: &str, bug_id: u32) -> u32 {
        self.fetch_label_points(full_repo_name, bug_id)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Failed to get points for bug #{}: {:#}", bug_id, e);
                0
            })
    }

    async fn reopen_bug(&self, full_repo_name: &str, bug_id: u32, reason: &str) -> bool {
        tracing::info!("Reopening bug #{} in {} ({})", bug_id, full_repo_name, reason);
        self.reopen(full_repo_name, bug_id, reason)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Skipping auto-reopen for bug #{}: {:#}", bug_id, e);
                false
            })
    }
}
