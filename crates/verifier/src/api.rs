use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /verify`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyRequest {
    /// JSON-encoded diff; non-JSON text is tolerated
    #[serde(default)]
    pub bug_diff_json: String,

    #[validate(length(min = 1, message = "bugs_doc must not be empty"))]
    pub bugs_doc: String,

    /// Bug key such as `BUG3`
    #[validate(length(min = 1, message = "bug_to_check must not be empty"))]
    pub bug_to_check: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Deterministic,
    Llm,
    LlmMaxTokens,
    LlmError,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// JSON object string such as `{"BUG3": "true"}`
    pub verification_result: String,
    pub method: Method,
}

impl VerifyResponse {
    pub fn new(verification_result: String, method: Method) -> Self {
        Self {
            verification_result,
            method,
        }
    }
}
