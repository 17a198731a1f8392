use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use storage::models::FileChange;
use tokio::process::Command;

use super::DiffSource;
use super::diff::parse_unified_diff;

const CLONE_TIMEOUT: Duration = Duration::from_secs(60);
const SHOW_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracts commit diffs by cloning into a throwaway directory
pub struct GitCli {
    base_url: String,
}

impl GitCli {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn repo_url(&self, full_repo_name: &str) -> String {
        format!("{}/{}.git", self.base_url, full_repo_name)
    }

    async fn show_commit(&self, full_repo_name: &str, commit_hash: &str) -> Result<String> {
        let checkout = tempfile::tempdir().context("Failed to create temporary directory")?;
        let repo_url = self.repo_url(full_repo_name);

        let mut clone = Command::new("git");
        clone.arg("clone").arg("--quiet").arg(&repo_url).arg(checkout.path());
        run(clone, CLONE_TIMEOUT)
            .await
            .with_context(|| format!("git clone {} failed", repo_url))?;

        let show = git_in(checkout.path(), &["show", "--format=", "--unified=3", commit_hash]);
        let output = run(show, SHOW_TIMEOUT)
            .await
            .with_context(|| format!("git show {} failed", commit_hash))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn git_in(dir: &Path, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    command.current_dir(dir).args(args);
    command
}

/// Run to completion within `limit`, failing on a non-zero exit status.
pub(crate) async fn run(mut command: Command, limit: Duration) -> Result<Output> {
    command.kill_on_drop(true);

    let output = tokio::time::timeout(limit, command.output())
        .await
        .with_context(|| format!("timed out after {}s", limit.as_secs()))??;

    if !output.status.success() {
        bail!(
            "exit status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(output)
}

#[async_trait]
impl DiffSource for GitCli {
    async fn code_changes(
        &self,
        full_repo_name: &str,
        commit_hash: &str,
    ) -> Option<Vec<FileChange>> {
        match self.show_commit(full_repo_name, commit_hash).await {
            Ok(diff_output) => Some(parse_unified_diff(&diff_output)),
            Err(e) => {
                tracing::error!(
                    "Failed to extract changes of {} from {}: {:#}",
                    commit_hash,
                    full_repo_name,
                    e
                );
                None
            }
        }
    }
}
