use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use storage::models::{BugDescription, FileChange, VerificationMethod, bug_key};
use verifier::{Method, VerifyRequest, VerifyResponse};

use super::{GatewayVerdict, VerificationBackend};

/// HTTP client for the verification gateway's `POST /verify`
pub struct GatewayClient {
    client: Client,
    url: String,
}

impl GatewayClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn post(&self, request: &VerifyRequest) -> Result<VerifyResponse> {
        let response = self.client.post(&self.url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("gateway returned {}: {}", status, body);
        }

        Ok(response.json().await?)
    }
}

/// Gateway request for one bug; the diff goes out under both `changed` and
/// `files`.
pub fn build_request(changes: &[FileChange], bug: &BugDescription) -> Result<VerifyRequest> {
    let bug_diff_json = serde_json::to_string(&json!({
        "changed": changes,
        "files": changes,
    }))?;

    Ok(VerifyRequest {
        bug_diff_json,
        bugs_doc: bug.to_bugs_doc(),
        bug_to_check: bug_key(bug.id),
    })
}

pub fn method_tag(method: Method) -> VerificationMethod {
    match method {
        Method::Deterministic => VerificationMethod::Deterministic,
        Method::Llm => VerificationMethod::Llm,
        Method::LlmMaxTokens => VerificationMethod::LlmMaxTokens,
        Method::LlmError => VerificationMethod::LlmError,
        Method::Unknown => VerificationMethod::Unknown,
    }
}

#[async_trait]
impl VerificationBackend for GatewayClient {
    async fn verify(&self, changes: &[FileChange], bug: &BugDescription) -> GatewayVerdict {
        let outcome = match build_request(changes, bug) {
            Ok(request) => self.post(&request).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) => GatewayVerdict {
                response: response.verification_result,
                method: method_tag(response.method),
            },
            Err(e) => {
                tracing::error!("Verification of bug #{} failed: {:#}", bug.id, e);
                GatewayVerdict::failed()
            }
        }
    }
}
