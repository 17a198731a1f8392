use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

lazy_static! {
    /// Tried in order against each commit message
    static ref BUG_ID_PATTERNS: Vec<Regex> = [
        r"(?i)bug[#\s]*(\d+)",
        r"(?i)fix[#\s]*(\d+)",
        r"(?i)#(\d+)",
        r"(?i)BUG[#\s]*(\d+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    pub name: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// The parts of a GitHub push event the tracker reads
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(default)]
    pub repository: Repository,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRepo {
    pub team_id: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoName {
    Team(TeamRepo),
    NotTeamRepo,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    Invalid,
    Empty,
}

/// Decode a webhook body sent either as JSON or as a form with a `payload`
/// field.
pub fn parse_payload(body: &[u8]) -> Result<Value, PayloadError> {
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(_) => {
            let form: HashMap<String, String> =
                serde_urlencoded::from_bytes(body).map_err(|_| PayloadError::Invalid)?;
            let payload = form.get("payload").ok_or(PayloadError::Invalid)?;
            serde_json::from_str(payload).map_err(|_| PayloadError::Invalid)?
        }
    };

    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };

    if empty {
        Err(PayloadError::Empty)
    } else {
        Ok(value)
    }
}

/// Split `team-<team>-<domain>[-...]` repository names.
pub fn parse_repo_name(name: &str) -> RepoName {
    if !name.starts_with("team-") {
        return RepoName::NotTeamRepo;
    }

    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() < 3 {
        return RepoName::Malformed;
    }

    RepoName::Team(TeamRepo {
        team_id: parts[1].to_string(),
        domain: parts[2].to_string(),
    })
}

/// First positive bug number named by a commit message. Bug ids start at 1.
pub fn extract_bug_id(message: &str) -> Option<u32> {
    BUG_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(message)
            .and_then(|captures| captures[1].parse().ok())
            .filter(|&id| id != 0)
    })
}
