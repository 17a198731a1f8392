use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Result, StorageError};
use crate::keys::validate_team_id;

const TEAMS_DIR: &str = "teams";
const BUG_FIXES_DIR: &str = "bug-fixes";
const PROGRESS_FILE: &str = "progress.json";
const LEADERBOARD_FILE: &str = "leaderboard.json";

/// File-system root holding every submission, progress and leaderboard file
///
/// Layout:
/// ```text
/// <root>/leaderboard.json
/// <root>/teams/<team>/progress.json
/// <root>/teams/<team>/bug-fixes/bug-<bug>.json
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory skeleton and an empty leaderboard if missing.
    pub async fn init(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.teams_dir()).await?;

        let leaderboard = self.leaderboard_path();
        if !tokio::fs::try_exists(&leaderboard).await? {
            tokio::fs::write(&leaderboard, "[]").await?;
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn teams_dir(&self) -> PathBuf {
        self.root.join(TEAMS_DIR)
    }

    pub fn team_dir(&self, team_id: &str) -> Result<PathBuf> {
        validate_team_id(team_id)?;
        Ok(self.teams_dir().join(team_id))
    }

    pub fn bug_fixes_dir(&self, team_id: &str) -> Result<PathBuf> {
        Ok(self.team_dir(team_id)?.join(BUG_FIXES_DIR))
    }

    pub fn submission_path(&self, team_id: &str, bug_id: u32) -> Result<PathBuf> {
        Ok(self
            .bug_fixes_dir(team_id)?
            .join(format!("bug-{}.json", bug_id)))
    }

    pub fn progress_path(&self, team_id: &str) -> Result<PathBuf> {
        Ok(self.team_dir(team_id)?.join(PROGRESS_FILE))
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.root.join(LEADERBOARD_FILE)
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound
            } else {
                StorageError::Io(e)
            }
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Pretty-print `value` to `path`, replacing the file via a rename so
    /// readers never observe a half-written document.
    pub(crate) async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;

        Ok(())
    }
}
