use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Progress;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub team_id: String,
    pub bugs_solved: u32,
    pub total_points: u32,
    pub last_submission: Option<DateTime<Utc>>,
    pub domain: String,
    pub rank: u32,
}

impl From<&Progress> for LeaderboardEntry {
    fn from(progress: &Progress) -> Self {
        Self {
            team_id: progress.team_id.clone(),
            bugs_solved: progress.verified_submissions,
            total_points: progress.total_points,
            last_submission: progress.last_submission,
            domain: progress.domain.clone(),
            rank: 0,
        }
    }
}
