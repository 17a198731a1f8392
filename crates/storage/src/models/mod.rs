mod bug;
mod code_change;
mod leaderboard;
mod progress;
mod submission;

pub use bug::{BugDescription, BugFiles, bug_key};
pub use code_change::{FileChange, Hunk};
pub use leaderboard::LeaderboardEntry;
pub use progress::Progress;
pub use submission::{Submission, SubmissionStatus, VerificationMethod};
