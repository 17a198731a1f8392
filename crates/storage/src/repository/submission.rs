use crate::error::{Result, StorageError};
use crate::models::Submission;
use crate::store::FileStore;

/// Repository for the per-(team, bug) submission files
pub struct SubmissionRepository<'a> {
    store: &'a FileStore,
}

impl<'a> SubmissionRepository<'a> {
    pub fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// Get the stored submission for a team's bug
    pub async fn find(&self, team_id: &str, bug_id: u32) -> Result<Submission> {
        let path = self.store.submission_path(team_id, bug_id)?;
        self.store.read_json(&path).await
    }

    /// Create or overwrite the submission file
    pub async fn save(&self, submission: &Submission) -> Result<()> {
        let path = self
            .store
            .submission_path(&submission.team_id, submission.bug_id)?;
        self.store.write_json(&path, submission).await
    }

    /// All submissions of a team, ordered by bug id
    pub async fn list_for_team(&self, team_id: &str) -> Result<Vec<Submission>> {
        let dir = self.store.bug_fixes_dir(team_id)?;

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let mut submissions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let submission: Submission = self.store.read_json(&path).await?;
                submissions.push(submission);
            }
        }

        submissions.sort_by_key(|s| s.bug_id);
        Ok(submissions)
    }
}
