use std::path::PathBuf;
use std::sync::Arc;

use storage::services::accounting::Accountant;

use crate::clients::{DiffSource, IssueTracker, VerificationBackend};
use crate::config::PointsPolicy;

#[derive(Clone)]
pub struct AppState {
    pub accountant: Accountant,
    pub diffs: Arc<dyn DiffSource>,
    pub issues: Arc<dyn IssueTracker>,
    pub verifier: Arc<dyn VerificationBackend>,
    pub domains_dir: PathBuf,
    pub points_policy: PointsPolicy,
    pub reopen_on_failure: bool,
}
