use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::FileChange;

/// How a submission's verdict was reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    /// Verification was skipped (missing diff or bug description)
    #[default]
    None,
    Deterministic,
    Llm,
    LlmMaxTokens,
    LlmError,
    /// The verification gateway could not be reached or answered non-200
    Error,
    #[serde(other)]
    Unknown,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Deterministic => "deterministic",
            Self::Llm => "llm",
            Self::LlmMaxTokens => "llm_max_tokens",
            Self::LlmError => "llm_error",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Submitted,
}

/// A single bug-fix attempt by a team
///
/// One file is kept per (team, bug) pair. A later commit for the same bug, or
/// a manual re-verification, overwrites it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Submission {
    pub team_id: String,
    pub bug_id: u32,
    pub domain: String,
    pub commit_hash: String,
    pub commit_message: String,
    /// `owner/name` of the pushed repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub submission_time: DateTime<Utc>,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub verified: bool,
    pub points: u32,
    /// `None` when the diff could not be extracted
    pub code_changes: Option<Vec<FileChange>>,
    /// Raw verdict text returned by the verification gateway
    pub llm_verification: String,
    pub llm_verified: bool,
    #[serde(default)]
    pub verification_method: VerificationMethod,
}

impl Submission {
    pub fn has_code_changes(&self) -> bool {
        self.code_changes
            .as_ref()
            .is_some_and(|changes| !changes.is_empty())
    }

    /// Replace the verdict fields after a (re-)verification.
    pub fn apply_verdict(
        &mut self,
        verified: bool,
        points_if_verified: u32,
        raw_response: String,
        method: VerificationMethod,
    ) {
        self.verified = verified;
        self.llm_verified = verified;
        self.points = if verified { points_if_verified } else { 0 };
        self.llm_verification = raw_response;
        self.verification_method = method;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_tags_are_tolerated() {
        let method: VerificationMethod = serde_json::from_str("\"something_new\"").unwrap();
        assert_eq!(method, VerificationMethod::Unknown);

        let method: VerificationMethod = serde_json::from_str("\"llm_max_tokens\"").unwrap();
        assert_eq!(method, VerificationMethod::LlmMaxTokens);
    }

    #[test]
    fn test_display_matches_wire_tag() {
        for method in [
            VerificationMethod::None,
            VerificationMethod::Deterministic,
            VerificationMethod::LlmMaxTokens,
            VerificationMethod::Error,
        ] {
            let wire = serde_json::to_value(method).unwrap();
            assert_eq!(wire, method.to_string());
        }
    }
}
