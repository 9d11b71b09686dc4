//! Chat-completions client — the single point of entry for all model calls.
//!
//! A deliberately thin wrapper over the OpenAI-compatible `/chat/completions`
//! endpoint. One request, one authoritative answer: the audit makes exactly
//! one model call, so there is no retry or backoff machinery here.
//!
//! Failures are split along the line a user needs for diagnosis:
//!
//! * [`AuditError::ModelUnreachable`] — the request never reached the
//!   service (DNS, connect, TLS, timeout).
//! * [`AuditError::ModelRejected`] — the service answered with a non-success
//!   status (bad key, rate limit, server error), with the service's own
//!   error message extracted from the body when present.

use crate::error::AuditError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A successful completion: the text plus token usage for the stats block.
#[derive(Debug)]
pub struct ChatOutcome {
    pub content: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for one OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl LlmClient {
    /// Build a client for `api_base` (no trailing slash required) with the
    /// given request timeout.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AuditError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AuditError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Send one chat request and return the completion text plus usage.
    pub async fn chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<ChatOutcome, AuditError> {
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuditError::ModelUnreachable {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The service usually wraps the message in {"error": {"message": ...}}.
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AuditError::ModelRejected {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| AuditError::ModelUnreachable {
                    detail: format!("invalid response body: {e}"),
                })?;

        let (prompt_tokens, completion_tokens) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AuditError::EmptyCompletion)?;

        debug!(
            "chat completed: {} prompt tokens, {} completion tokens",
            prompt_tokens, completion_tokens
        );

        Ok(ChatOutcome {
            content,
            prompt_tokens,
            completion_tokens,
        })
    }
}
