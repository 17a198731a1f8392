//! Whole-state recomputation of team progress and the global leaderboard.
//!
//! Every write rebuilds the affected team's progress from all of its
//! submission files and then the leaderboard from all progress files.

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::database::Database;
use crate::error::Result;
use crate::models::{LeaderboardEntry, Progress, Submission};
use crate::repository::{
    leaderboard::LeaderboardRepository, progress::ProgressRepository,
    submission::SubmissionRepository,
};
use crate::store::FileStore;

const UNKNOWN_DOMAIN: &str = "unknown";

/// Fold a team's submissions into its aggregate progress
pub fn fold_progress(team_id: &str, submissions: Vec<Submission>) -> Progress {
    let mut progress = Progress {
        team_id: team_id.to_string(),
        total_submissions: submissions.len() as u32,
        verified_submissions: 0,
        total_points: 0,
        last_submission: None,
        submissions: Vec::new(),
        domain: UNKNOWN_DOMAIN.to_string(),
    };

    for submission in &submissions {
        progress.domain = submission.domain.clone();

        if submission.verified {
            progress.verified_submissions += 1;
            progress.total_points += submission.points;
        }

        if progress
            .last_submission
            .is_none_or(|last| submission.submission_time > last)
        {
            progress.last_submission = Some(submission.submission_time);
        }
    }

    progress.submissions = submissions;
    progress
}

fn ranking_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| a.last_submission.cmp(&b.last_submission))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

/// Sort by points descending, then earliest last submission, then team id,
/// and assign 1-based ranks.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(ranking_order);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }
    entries
}

/// Rebuild and persist one team's progress file
pub async fn rebuild_progress(store: &FileStore, team_id: &str) -> Result<Progress> {
    let submissions = SubmissionRepository::new(store)
        .list_for_team(team_id)
        .await?;

    let progress = fold_progress(team_id, submissions);
    ProgressRepository::new(store).save(&progress).await?;

    Ok(progress)
}

/// Rebuild and persist the leaderboard from every team's progress file
pub async fn rebuild_leaderboard(store: &FileStore) -> Result<Vec<LeaderboardEntry>> {
    let all_progress = ProgressRepository::new(store).list_all().await?;

    let entries = rank_entries(all_progress.iter().map(LeaderboardEntry::from).collect());
    LeaderboardRepository::new(store).save(&entries).await?;

    tracing::info!("Leaderboard updated: {} team(s)", entries.len());
    Ok(entries)
}

/// Writes submissions and keeps progress, leaderboard and the database
/// mirror in step with them
///
/// The file system is authoritative. Database failures are logged and never
/// fail the write.
#[derive(Debug, Clone)]
pub struct Accountant {
    store: FileStore,
    database: Option<Database>,
    write_lock: Arc<Mutex<()>>,
}

impl Accountant {
    pub fn new(store: FileStore, database: Option<Database>) -> Self {
        Self {
            store,
            database,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    /// Persist a submission, then recompute the team's progress and the
    /// leaderboard.
    pub async fn record(&self, submission: &Submission) -> Result<Progress> {
        let _guard = self.write_lock.lock().await;

        SubmissionRepository::new(&self.store)
            .save(submission)
            .await?;

        if submission.verified {
            self.mirror_manual_review(submission).await;
        } else {
            tracing::info!(
                "Bug #{} of team {} not verified, skipping manual-review upload",
                submission.bug_id,
                submission.team_id
            );
        }

        self.recompute(&submission.team_id).await
    }

    /// Recompute a team's progress and the leaderboard without writing a
    /// submission.
    pub async fn refresh_team(&self, team_id: &str) -> Result<Progress> {
        let _guard = self.write_lock.lock().await;
        self.recompute(team_id).await
    }

    async fn recompute(&self, team_id: &str) -> Result<Progress> {
        let progress = rebuild_progress(&self.store, team_id).await?;
        self.mirror_progress(&progress).await;

        let leaderboard = rebuild_leaderboard(&self.store).await?;
        self.mirror_leaderboard(&leaderboard).await;

        Ok(progress)
    }

    async fn mirror_manual_review(&self, submission: &Submission) {
        let Some(db) = &self.database else {
            tracing::warn!("MongoDB not available, skipping manual-review update");
            return;
        };

        match db.manual_review().upsert(submission).await {
            Ok(document_id) => tracing::info!("MongoDB manual-review updated: {}", document_id),
            Err(e) => tracing::error!("Failed to update MongoDB manual-review: {}", e),
        }
    }

    async fn mirror_progress(&self, progress: &Progress) {
        let Some(db) = &self.database else {
            return;
        };

        if let Err(e) = db.team_progress().upsert(progress).await {
            tracing::error!(
                "Failed to update MongoDB progress for team {}: {}",
                progress.team_id,
                e
            );
        }
    }

    async fn mirror_leaderboard(&self, entries: &[LeaderboardEntry]) {
        let Some(db) = &self.database else {
            tracing::warn!("MongoDB not available, skipping leaderboard update");
            return;
        };

        match db.leaderboard().replace_all(entries).await {
            Ok(report) => tracing::info!(
                "MongoDB leaderboard updated: {} upserted, {} pruned",
                report.upserted,
                report.pruned
            ),
            Err(e) => tracing::error!("Failed to update MongoDB leaderboard: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubmissionStatus, VerificationMethod};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap()
    }

    fn submission(team_id: &str, bug_id: u32, verified: bool, minute: u32) -> Submission {
        Submission {
            team_id: team_id.to_string(),
            bug_id,
            domain: "nlp".to_string(),
            commit_hash: format!("c{}", bug_id),
            commit_message: format!("fix bug#{}", bug_id),
            repository: Some(format!("org/team-{}-nlp", team_id)),
            submission_time: at(minute),
            status: SubmissionStatus::Submitted,
            verified,
            points: if verified { 10 } else { 0 },
            code_changes: None,
            llm_verification: "{}".to_string(),
            llm_verified: verified,
            verification_method: VerificationMethod::Deterministic,
        }
    }

    fn entry(team_id: &str, points: u32, last: Option<u32>) -> LeaderboardEntry {
        LeaderboardEntry {
            team_id: team_id.to_string(),
            bugs_solved: points / 10,
            total_points: points,
            last_submission: last.map(at),
            domain: "nlp".to_string(),
            rank: 0,
        }
    }

    #[test]
    fn test_fold_counts_only_verified_points() {
        let progress = fold_progress(
            "7",
            vec![submission("7", 1, true, 5), submission("7", 2, false, 9)],
        );

        assert_eq!(progress.total_submissions, 2);
        assert_eq!(progress.verified_submissions, 1);
        assert_eq!(progress.total_points, 10);
        assert_eq!(progress.last_submission, Some(at(9)));
        assert_eq!(progress.domain, "nlp");
    }

    #[test]
    fn test_fold_without_submissions() {
        let progress = fold_progress("7", Vec::new());
        assert_eq!(progress.domain, "unknown");
        assert_eq!(progress.last_submission, None);
    }

    #[test]
    fn test_ranks_are_a_total_order() {
        let ranked = rank_entries(vec![
            entry("c", 10, Some(30)),
            entry("a", 20, Some(50)),
            entry("b", 10, Some(10)),
            entry("d", 10, Some(10)),
            entry("e", 0, None),
        ]);

        let order: Vec<&str> = ranked.iter().map(|e| e.team_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "d", "c", "e"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].rank < pair[1].rank);
            assert!(pair[0].total_points >= pair[1].total_points);
            if pair[0].total_points == pair[1].total_points {
                assert!(pair[0].last_submission <= pair[1].last_submission);
            }
        }
    }

    #[tokio::test]
    async fn test_record_rebuilds_progress_and_leaderboard() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.init().await.unwrap();
        let accountant = Accountant::new(store.clone(), None);

        accountant.record(&submission("7", 3, true, 1)).await.unwrap();
        accountant.record(&submission("9", 1, true, 2)).await.unwrap();
        let progress = accountant.record(&submission("9", 2, true, 3)).await.unwrap();
        assert_eq!(progress.total_points, 20);

        let leaderboard = LeaderboardRepository::new(&store).load().await.unwrap();
        assert_eq!(leaderboard.len(), 2);
        assert_eq!(leaderboard[0].team_id, "9");
        assert_eq!(leaderboard[0].rank, 1);
        assert_eq!(leaderboard[1].team_id, "7");
    }

    #[tokio::test]
    async fn test_recomputation_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let accountant = Accountant::new(store.clone(), None);

        accountant.record(&submission("7", 3, true, 1)).await.unwrap();
        accountant.record(&submission("8", 3, true, 1)).await.unwrap();

        let first = std::fs::read(store.leaderboard_path()).unwrap();
        rebuild_leaderboard(&store).await.unwrap();
        let second = std::fs::read(store.leaderboard_path()).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let accountant = Accountant::new(store, None);

        accountant.record(&submission("7", 3, false, 1)).await.unwrap();
        let progress = accountant.record(&submission("7", 3, true, 2)).await.unwrap();

        assert_eq!(progress.total_submissions, 1);
        assert_eq!(progress.total_points, 10);
    }
}
