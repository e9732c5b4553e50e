//! Summarisation client: one chat-completion request per document.
//!
//! The client is deliberately thin. It short-circuits blank input, refuses to
//! touch the network without a credential, sends exactly one request, and
//! propagates upstream failures with their status and body intact. There is
//! no retry, no streaming, and no caching of identical prompts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::prompts::{effective_prompt, SYSTEM_PROMPT};

/// Fixed sampling temperature. Kept low so summaries stay faithful to the
/// source rather than creative.
pub const TEMPERATURE: f64 = 0.2;

/// Per-call overrides for a summary request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummarizeOptions {
    /// Completion token budget; falls back to [`AppConfig::max_tokens`].
    pub max_tokens: Option<u32>,
}

/// Turns text (plus optional context) into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        text: &str,
        context: Option<&str>,
        options: Option<&SummarizeOptions>,
    ) -> Result<String, RelayError>;
}

/// Production summariser talking to an OpenAI-compatible chat-completions
/// endpoint over HTTPS.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    config: Arc<AppConfig>,
}

impl OpenAiSummarizer {
    /// Build a client with the configured request timeout.
    pub fn new(config: Arc<AppConfig>) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(
        &self,
        text: &str,
        context: Option<&str>,
        options: Option<&SummarizeOptions>,
    ) -> Result<String, RelayError> {
        // Nothing to summarise: answer without a network call. This check
        // runs before the credential check so blank input never fails on an
        // unconfigured server.
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let api_key = self
            .config
            .openai_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(RelayError::MissingCredential)?;

        let prompt = effective_prompt(text, context);
        let body = build_request_body(&self.config, &prompt, options);
        debug!(
            model = %self.config.model,
            prompt_bytes = prompt.len(),
            "requesting summary"
        );

        let response = self
            .client
            .post(&self.config.chat_completions_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            return Err(RelayError::SummarizationApi {
                status: status.as_u16(),
                body: payload,
            });
        }

        let parsed: Value = serde_json::from_str(&payload)
            .map_err(|e| RelayError::Internal(format!("malformed summarization response: {e}")))?;

        // A reply-less completion is unusual but not an error: the caller
        // gets an empty summary.
        Ok(extract_reply(&parsed)
            .map(|reply| reply.trim().to_string())
            .unwrap_or_default())
    }
}

/// Assemble the chat-completions request body.
fn build_request_body(
    config: &AppConfig,
    prompt: &str,
    options: Option<&SummarizeOptions>,
) -> Value {
    let max_tokens = options
        .and_then(|o| o.max_tokens)
        .unwrap_or(config.max_tokens);

    json!({
        "model": config.model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": prompt },
        ],
        "max_tokens": max_tokens,
        "temperature": TEMPERATURE,
    })
}

/// Pull the assistant's reply out of a completion response.
///
/// Two shapes are tolerated: the structured `choices[0].message.content`
/// field, and the legacy flat `choices[0].text` field used by older
/// completions-style servers.
fn extract_reply(response: &Value) -> Option<&str> {
    let first = response.get("choices")?.as_array()?.first()?;

    if let Some(content) = first
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        return Some(content);
    }

    first.get("text").and_then(Value::as_str)
}
