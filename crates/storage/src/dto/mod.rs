pub mod health;
pub mod verification;
pub mod webhook;
