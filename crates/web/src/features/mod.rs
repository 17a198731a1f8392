pub mod health;
pub mod leaderboard;
pub mod submissions;
pub mod teams;
pub mod webhook;
