use mongodb::{
    Collection,
    bson::{DateTime, Document, doc, to_document},
};

use crate::error::Result;
use crate::keys::manual_review_key;
use crate::models::{LeaderboardEntry, Progress, Submission};

/// Counts from one leaderboard mirror pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub upserted: u64,
    pub pruned: u64,
}

/// Leaderboard rows keyed by `team_id`
pub struct LeaderboardCollection {
    collection: Collection<Document>,
}

impl LeaderboardCollection {
    pub fn new(db: &mongodb::Database, name: &str) -> Self {
        Self {
            collection: db.collection(name),
        }
    }

    /// Make the collection mirror `entries` exactly: upsert every row, then
    /// delete rows of teams that are no longer ranked.
    pub async fn replace_all(&self, entries: &[LeaderboardEntry]) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for entry in entries {
            let mut document = to_document(entry)?;
            document.insert("updated_at", DateTime::now());

            self.collection
                .update_one(doc! { "team_id": entry.team_id.as_str() }, doc! { "$set": document })
                .upsert(true)
                .await?;

            report.upserted += 1;
        }

        let deleted = self.collection.delete_many(prune_filter(entries)).await?;
        report.pruned = deleted.deleted_count;

        Ok(report)
    }
}

/// Rows of teams missing from `entries`. An empty board selects every row.
fn prune_filter(entries: &[LeaderboardEntry]) -> Document {
    if entries.is_empty() {
        return doc! {};
    }

    let team_ids: Vec<String> = entries.iter().map(|entry| entry.team_id.clone()).collect();
    doc! { "team_id": { "$nin": team_ids } }
}

/// Verified submissions awaiting a human look, keyed by `<team>_bug_<bug>`
pub struct ManualReviewCollection {
    collection: Collection<Document>,
}

impl ManualReviewCollection {
    pub fn new(db: &mongodb::Database, name: &str) -> Self {
        Self {
            collection: db.collection(name),
        }
    }

    pub async fn upsert(&self, submission: &Submission) -> Result<String> {
        let document_id = manual_review_key(&submission.team_id, submission.bug_id);

        let mut document = to_document(submission)?;
        document.insert("updated_at", DateTime::now());
        document.insert("document_id", document_id.as_str());

        self.collection
            .update_one(
                doc! { "document_id": document_id.as_str() },
                doc! { "$set": document },
            )
            .upsert(true)
            .await?;

        Ok(document_id)
    }
}

/// Full progress documents keyed by `team_id`
pub struct TeamProgressCollection {
    collection: Collection<Document>,
}

impl TeamProgressCollection {
    pub fn new(db: &mongodb::Database, name: &str) -> Self {
        Self {
            collection: db.collection(name),
        }
    }

    pub async fn upsert(&self, progress: &Progress) -> Result<()> {
        let mut document = to_document(progress)?;
        document.insert("updated_at", DateTime::now());

        self.collection
            .update_one(
                doc! { "team_id": progress.team_id.as_str() },
                doc! { "$set": document },
            )
            .upsert(true)
            .await?;

        Ok(())
    }
}
