use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reply for events the tracker deliberately does not act on
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IgnoredResponse {
    pub status: String,
    pub reason: String,
}

impl IgnoredResponse {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            status: "ignored".to_string(),
            reason: reason.into(),
        }
    }
}

/// Summary of a processed push event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessedResponse {
    pub status: String,
    pub team_id: String,
    pub commits_processed: u32,
}

impl ProcessedResponse {
    pub fn new(team_id: impl Into<String>, commits_processed: u32) -> Self {
        Self {
            status: "processed".to_string(),
            team_id: team_id.into(),
            commits_processed,
        }
    }
}
