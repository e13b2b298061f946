//! Anthropic Messages API gateway.
//!
//! The summarizer and the JD analyzer both go through [`LlmClient::call_json`];
//! nothing else in the crate talks to the model.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::retry::{Attempt, RetryPolicy};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const RETRY_POLICY: RetryPolicy = RetryPolicy::new(3, Duration::from_secs(1));

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by the model API: {0}")]
    RateLimited(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<Block>,
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .find_map(|b| b.text.as_deref())
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    endpoint: String,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, MESSAGES_URL, RETRY_POLICY)
    }

    pub(crate) fn with_endpoint(
        api_key: String,
        endpoint: &str,
        retry: RetryPolicy,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            http: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            endpoint: endpoint.to_string(),
            retry,
        })
    }

    /// Sends one user turn and parses the first text block as JSON into `T`.
    /// The system prompt must ask for JSON-only output.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let request = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        };
        let request = &request;

        let response = self
            .retry
            .run("LLM call", move || self.send(request))
            .await?;
        parse_json_text(response.first_text().ok_or(LlmError::EmptyContent)?)
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> Result<MessagesResponse, Attempt<LlmError>> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| Attempt::Retry(LlmError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            let body: MessagesResponse = response
                .json()
                .await
                .map_err(|e| Attempt::Fatal(LlmError::Http(e)))?;
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                body.usage.input_tokens, body.usage.output_tokens
            );
            return Ok(body);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&raw)
            .map(|e| e.error.message)
            .unwrap_or(raw);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("LLM API rate limited: {}", message);
            return Err(Attempt::Retry(LlmError::RateLimited(message)));
        }

        let err = LlmError::Api {
            status: status.as_u16(),
            message,
        };
        if status.is_server_error() {
            Err(Attempt::Retry(err))
        } else {
            Err(Attempt::Fatal(err))
        }
    }
}

/// Parses model output as JSON, tolerating a surrounding code fence.
pub(crate) fn parse_json_text<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(serde_json::from_str(text)?)
}

fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let rest = rest.trim();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
