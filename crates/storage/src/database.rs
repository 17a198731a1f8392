use std::time::Duration;

use mongodb::{Client, bson::doc, options::ClientOptions};

use crate::error::Result;
use crate::repository::documents::{
    LeaderboardCollection, ManualReviewCollection, TeamProgressCollection,
};

/// Collection names inside the tracker database
#[derive(Debug, Clone)]
pub struct CollectionNames {
    pub leaderboard: String,
    pub manual_review: String,
    pub team_progress: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            leaderboard: "leaderboard".to_string(),
            manual_review: "manual-review".to_string(),
            team_progress: "team_progress".to_string(),
        }
    }
}

/// Handle to the MongoDB database mirroring the file-based state
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
    names: CollectionNames,
}

impl Database {
    /// Connect and ping. Server selection gives up after five seconds.
    pub async fn connect(uri: &str, database: &str, names: CollectionNames) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(Duration::from_secs(5));
        options.connect_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(options)?;
        let db = client.database(database);

        let database = Self { db, names };
        database.ping().await?;

        Ok(database)
    }

    pub async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.db.name()
    }

    pub fn leaderboard(&self) -> LeaderboardCollection {
        LeaderboardCollection::new(&self.db, &self.names.leaderboard)
    }

    pub fn manual_review(&self) -> ManualReviewCollection {
        ManualReviewCollection::new(&self.db, &self.names.manual_review)
    }

    pub fn team_progress(&self) -> TeamProgressCollection {
        TeamProgressCollection::new(&self.db, &self.names.team_progress)
    }
}
