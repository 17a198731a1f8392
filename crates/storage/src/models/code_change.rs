use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lines added and removed by one hunk of a commit diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Hunk {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl Hunk {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// All non-empty hunks a commit applied to a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileChange {
    pub filename: String,
    pub changes: Vec<Hunk>,
}
