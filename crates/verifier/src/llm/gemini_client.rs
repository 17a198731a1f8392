use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompts::PromptBuilder;
use super::response::{clean_llm_response, verdict_json};
use crate::api::{Method, VerifyResponse};
use crate::error::{Result, VerifierError};
use crate::gateway::SemanticJudge;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

const FINISH_REASON_MAX_TOKENS: &str = "MAX_TOKENS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: Some(text) }],
        }
    }

    fn first_text(&self) -> Option<&str> {
        self.parts.first()?.text.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<i64>,
    pub candidates_token_count: Option<i64>,
    pub total_token_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

/// Client for the Gemini `generateContent` API
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    default_config: GenerationConfig,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://generativelanguage.googleapis.com")
    /// * `model` - Model name (e.g., "gemini-2.5-flash-preview-09-2025")
    /// * `api_key` - API key; requests fail with `MissingApiKey` without one
    pub fn new(base_url: String, model: String, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;

        let default_config = GenerationConfig {
            temperature: Some(0.1),
            top_p: None,
            top_k: None,
            max_output_tokens: Some(2000),
        };

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            default_config,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(VerifierError::MissingApiKey)
    }

    /// Generate content for a system instruction and a single user turn
    pub async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        custom_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.api_key()?;

        let request = GenerateContentRequest {
            contents: vec![Content::text(user_prompt.to_string())],
            system_instruction: Content::text(system_instruction.to_string()),
            generation_config: custom_config.unwrap_or_else(|| self.default_config.clone()),
        };

        tracing::info!(
            "Sending request to Gemini (model: {}, prompt length: {} chars)",
            self.model,
            user_prompt.len()
        );

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error ({}): {}", status, body);
            return Err(VerifierError::UpstreamError { status, body });
        }

        let generated: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &generated.usage_metadata {
            tracing::info!(
                "Gemini generation complete: {} prompt tokens, {} output tokens, {} total",
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0),
                usage.total_token_count.unwrap_or(0)
            );
        }

        Ok(generated)
    }

    /// Check the configured model exists and the key is accepted
    pub async fn verify_model(&self) -> Result<bool> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/v1beta/models/{}", self.base_url, self.model))
            .query(&[("key", api_key)])
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

/// Map a `generateContent` answer onto the gateway's verdict contract.
pub fn interpret_response(response: &GenerateContentResponse, bug_to_check: &str) -> VerifyResponse {
    let Some(candidate) = response.candidates.first() else {
        tracing::warn!("No candidates in Gemini response");
        return VerifyResponse::new(verdict_json(bug_to_check, false), Method::LlmError);
    };

    if candidate.finish_reason.as_deref() == Some(FINISH_REASON_MAX_TOKENS) {
        tracing::warn!("Response hit MAX_TOKENS limit, returning rejection");
        return VerifyResponse::new(verdict_json(bug_to_check, false), Method::LlmMaxTokens);
    }

    match candidate.content.as_ref().and_then(Content::first_text) {
        Some(text) => VerifyResponse::new(clean_llm_response(text), Method::Llm),
        None => {
            tracing::warn!("Unexpected Gemini response structure: {:?}", candidate);
            VerifyResponse::new(verdict_json(bug_to_check, false), Method::LlmError)
        }
    }
}

#[async_trait]
impl SemanticJudge for GeminiClient {
    async fn judge(
        &self,
        bugs_doc: &str,
        pretty_diff: &str,
        bug_to_check: &str,
    ) -> Result<VerifyResponse> {
        let system_instruction = PromptBuilder::system_instruction(bug_to_check);
        let user_prompt = PromptBuilder::user_prompt(bugs_doc, pretty_diff, bug_to_check);

        let response = self.generate(&system_instruction, &user_prompt, None).await?;
        Ok(interpret_response(&response, bug_to_check))
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            default_config: GenerationConfig {
                temperature: Some(0.1),
                top_p: None,
                top_k: None,
                max_output_tokens: Some(2000),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_request_uses_camel_case_fields() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("user".to_string())],
            system_instruction: Content::text("system".to_string()),
            generation_config: GenerationConfig {
                temperature: Some(0.1),
                top_p: None,
                top_k: None,
                max_output_tokens: Some(2000),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2000);
        assert!(value["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn test_text_answer_is_cleaned() {
        let response = parse(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "```json\n{\"BUG1\": \"true\"}\n```"}]}, "finishReason": "STOP"}]}"#,
        );
        let verdict = interpret_response(&response, "BUG1");
        assert_eq!(verdict.method, Method::Llm);
        assert_eq!(verdict.verification_result, r#"{"BUG1": "true"}"#);
    }

    #[test]
    fn test_max_tokens_is_a_rejection() {
        let response = parse(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#);
        let verdict = interpret_response(&response, "BUG1");
        assert_eq!(verdict.method, Method::LlmMaxTokens);
        assert_eq!(verdict.verification_result, r#"{"BUG1":"false"}"#);
    }

    #[test]
    fn test_missing_candidates_is_an_error_rejection() {
        let verdict = interpret_response(&parse("{}"), "BUG1");
        assert_eq!(verdict.method, Method::LlmError);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let client = GeminiClient::new(DEFAULT_BASE_URL.to_string(), DEFAULT_MODEL.to_string(), None).unwrap();
        let result = client.judge("doc", "{}", "BUG1").await;
        assert!(matches!(result, Err(VerifierError::MissingApiKey)));
    }

    #[tokio::test]
    #[ignore] // Only run with GEMINI_API_KEY set
    async fn test_live_model_is_available() {
        let client = GeminiClient::default();
        assert!(client.verify_model().await.unwrap());
    }
}
