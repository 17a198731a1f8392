use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::VerificationMethod;

/// Result of a manual re-verification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReverifyResponse {
    pub verified: bool,
    pub llm_response: String,
    pub method: VerificationMethod,
    pub message: String,
}
