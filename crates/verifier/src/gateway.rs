use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use validator::Validate;

use crate::api::{Method, VerifyRequest, VerifyResponse};
use crate::deterministic::{self, Outcome};
use crate::error::Result;
use crate::llm::verdict_json;

/// Semantic fallback consulted when pattern matching is inconclusive
#[async_trait]
pub trait SemanticJudge: Send + Sync {
    async fn judge(
        &self,
        bugs_doc: &str,
        pretty_diff: &str,
        bug_to_check: &str,
    ) -> Result<VerifyResponse>;
}

pub struct Gateway {
    judge: Arc<dyn SemanticJudge>,
}

impl Gateway {
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self { judge }
    }

    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse> {
        request.validate()?;

        let diff = parse_diff(&request.bug_diff_json);
        let bug = request.bug_to_check.as_str();

        let outcome = deterministic::verify(&request.bugs_doc, &diff, bug);
        tracing::info!("Deterministic verification for {}: {}", bug, outcome);

        match outcome {
            Outcome::Matched(_) => {
                return Ok(VerifyResponse::new(verdict_json(bug, true), Method::Deterministic));
            }
            Outcome::NotMatched => {
                return Ok(VerifyResponse::new(verdict_json(bug, false), Method::Deterministic));
            }
            Outcome::Inconclusive(_) => {}
        }

        tracing::info!("Falling back to LLM verification for {}", bug);
        let pretty_diff = serde_json::to_string_pretty(&diff)?;
        self.judge.judge(&request.bugs_doc, &pretty_diff, bug).await
    }
}

/// Non-JSON diffs are kept as `{"raw": <text>}`.
fn parse_diff(bug_diff_json: &str) -> Value {
    serde_json::from_str(bug_diff_json).unwrap_or_else(|_| json!({ "raw": bug_diff_json }))
}
