pub mod bug;
pub mod documents;
pub mod leaderboard;
pub mod progress;
pub mod submission;
