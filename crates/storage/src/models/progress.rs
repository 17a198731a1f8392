use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Submission;

/// Per-team aggregate, always recomputed from the team's submission files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Progress {
    pub team_id: String,
    pub total_submissions: u32,
    pub verified_submissions: u32,
    pub total_points: u32,
    pub last_submission: Option<DateTime<Utc>>,
    pub submissions: Vec<Submission>,
    pub domain: String,
}
