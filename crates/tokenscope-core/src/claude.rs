//! Anthropic Messages API client shared by the Claude naming and scoring
//! strategies.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnthropicConfig;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Thin client for single-turn text completions.
#[derive(Clone)]
pub struct ClaudeClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

impl ClaudeClient {
    /// Build a client whose requests give up after `timeout`, so a stalled
    /// call surfaces as an error and the fallback strategies can take over.
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Claude HTTP client")?;
        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub fn from_config(config: &AnthropicConfig) -> Result<Self> {
        Self::new(
            &config.api_key,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user turn and return the concatenated text blocks.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message { role: "user", content: user }],
        };

        debug!(model = %self.model, prompt_bytes = user.len(), "Calling Claude API");
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to call Claude API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Claude API error (HTTP {}): {}", status, error_text);
        }

        let body: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Claude API response")?;

        let text: String = body
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .filter_map(|c| c.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            anyhow::bail!("No text content in Claude API response");
        }
        Ok(text)
    }
}

/// Parse a JSON value out of a model reply.
///
/// Tries the whole text, then the first fenced code block, then the span
/// from the first `{` to the last `}`.
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(fenced) = fenced_block(trimmed) {
        return serde_json::from_str(fenced).context("Invalid JSON in fenced block");
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return serde_json::from_str(&trimmed[start..=end])
                .context("Invalid JSON object in response");
        }
    }

    anyhow::bail!("No JSON found in response")
}

/// Body of the first ``` fence, with an optional `json` tag stripped.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim())
}

/// Pretty JSON schema for `T`, embedded in prompts.
pub fn schema_json<T: schemars::JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
