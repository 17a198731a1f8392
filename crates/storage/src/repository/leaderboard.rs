use crate::error::Result;
use crate::models::LeaderboardEntry;
use crate::store::FileStore;

/// Repository for the global `leaderboard.json`
pub struct LeaderboardRepository<'a> {
    store: &'a FileStore,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        self.store.read_json(&self.store.leaderboard_path()).await
    }

    /// Replace the whole leaderboard file
    pub async fn save(&self, entries: &[LeaderboardEntry]) -> Result<()> {
        self.store
            .write_json(&self.store.leaderboard_path(), entries)
            .await
    }
}
