use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

/// How many points a verified bug is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsPolicy {
    /// Every bug is worth the same
    Fixed(u32),
    /// `difficulty-easy|medium|hard` labels on the bug's GitHub issue
    Labels,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub domains_dir: PathBuf,
    pub verifier_url: String,
    pub git_base_url: String,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub mongodb_collection: String,
    pub points_policy: PointsPolicy,
    pub reopen_on_failure: bool,
    pub api_keys: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let fixed_points = env_or("FIXED_POINTS", 10u32).context("FIXED_POINTS must be a number")?;

        let points_policy = match env_string("POINTS_MODE", "fixed").to_lowercase().as_str() {
            "fixed" => PointsPolicy::Fixed(fixed_points),
            "labels" => PointsPolicy::Labels,
            other => bail!("POINTS_MODE must be 'fixed' or 'labels', got '{}'", other),
        };

        Ok(Self {
            host: env_string("HOST", "0.0.0.0"),
            port: env_or("PORT", 5000u16).context("PORT must be a number")?,
            data_dir: env_string("DATA_DIR", ".").into(),
            domains_dir: env_string("DOMAINS_DIR", "domains").into(),
            verifier_url: env_string("VERIFIER_URL", "http://localhost:8000/verify"),
            git_base_url: env_string("GIT_BASE_URL", "https://github.com"),
            mongodb_uri: std::env::var("MONGODB_URI")
                .ok()
                .filter(|uri| !uri.trim().is_empty()),
            mongodb_database: env_string("MONGODB_DATABASE", "hackathon_tracker"),
            mongodb_collection: env_string("MONGODB_COLLECTION", "leaderboard"),
            points_policy,
            reopen_on_failure: env_or("REOPEN_ON_FAILURE", true)
                .context("REOPEN_ON_FAILURE must be true or false")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
        })
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse()?),
        Err(_) => Ok(default),
    }
}
