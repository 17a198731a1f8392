use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, StorageError};

lazy_static! {
    /// Team identifiers become directory names, so they are restricted to a
    /// path-safe alphabet.
    pub static ref TEAM_ID_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_.\-]{1,64}$").unwrap();
}

pub fn validate_team_id(team_id: &str) -> Result<()> {
    if team_id == "." || team_id == ".." || !TEAM_ID_PATTERN.is_match(team_id) {
        return Err(StorageError::InvalidKey(format!(
            "team id '{}' is not a valid key",
            team_id
        )));
    }
    Ok(())
}

/// Domains are matched against the same alphabet as team ids.
pub fn validate_domain(domain: &str) -> Result<()> {
    validate_team_id(domain).map_err(|_| {
        StorageError::InvalidKey(format!("domain '{}' is not a valid key", domain))
    })
}

/// Key used for the per-submission manual review document.
pub fn manual_review_key(team_id: &str, bug_id: u32) -> String {
    format!("{}_bug_{}", team_id, bug_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_team_ids() {
        assert!(validate_team_id("7").is_ok());
        assert!(validate_team_id("team_alpha-2").is_ok());
    }

    #[test]
    fn test_rejects_path_like_team_ids() {
        assert!(validate_team_id("..").is_err());
        assert!(validate_team_id("a/b").is_err());
        assert!(validate_team_id("").is_err());
    }

    #[test]
    fn test_manual_review_key() {
        assert_eq!(manual_review_key("7", 3), "7_bug_3");
    }
}
