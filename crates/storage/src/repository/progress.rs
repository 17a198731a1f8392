use crate::error::Result;
use crate::models::Progress;
use crate::store::FileStore;

/// Repository for `teams/<team>/progress.json`
pub struct ProgressRepository<'a> {
    store: &'a FileStore,
}

impl<'a> ProgressRepository<'a> {
    pub fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    pub async fn find(&self, team_id: &str) -> Result<Progress> {
        let path = self.store.progress_path(team_id)?;
        self.store.read_json(&path).await
    }

    pub async fn save(&self, progress: &Progress) -> Result<()> {
        let path = self.store.progress_path(&progress.team_id)?;
        self.store.write_json(&path, progress).await
    }

    /// Progress of every team directory that has a progress file, ordered by
    /// directory name
    pub async fn list_all(&self) -> Result<Vec<Progress>> {
        let teams_dir = self.store.teams_dir();

        let mut entries = match tokio::fs::read_dir(&teams_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut team_ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                team_ids.push(name.to_string());
            }
        }
        team_ids.sort();

        let mut all = Vec::with_capacity(team_ids.len());
        for team_id in team_ids {
            match self.find(&team_id).await {
                Ok(progress) => all.push(progress),
                Err(e) if e.is_not_found() => continue,
                Err(e) => {
                    tracing::warn!("Skipping unreadable progress for team {}: {}", team_id, e);
                }
            }
        }

        Ok(all)
    }
}
