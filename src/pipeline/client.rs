//! The completion-service client: one non-streaming round trip.
//!
//! [`CompletionClient`] is the seam between the pipeline and the remote
//! service. Production uses [`HttpCompletionClient`] (reqwest against an
//! OpenAI-compatible `/chat/completions` endpoint); tests inject a stub
//! through [`crate::config::AuditConfig::client`] and assert on call
//! counts without any global state.
//!
//! There is deliberately no retry loop here: a transient failure surfaces
//! immediately as a typed error, and retrying is a user-initiated
//! re-invocation at the caller's layer.

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::pipeline::prompt::{AuditRequest, ChatMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// The text completion returned by the remote service.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Assistant message content, passed through verbatim downstream.
    pub content: String,
    /// Prompt tokens billed, if the service reported usage.
    pub prompt_tokens: u32,
    /// Completion tokens billed, if the service reported usage.
    pub completion_tokens: u32,
}

/// An interface for sending a prepared audit request to a completion
/// service and receiving its text response.
///
/// Implementors encapsulate transport, serialisation, and vendor details;
/// the pipeline stays decoupled from any particular provider or HTTP
/// library.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform the single request/response exchange.
    async fn complete(&self, request: &AuditRequest) -> Result<Completion, AuditError>;
}

// ── Wire types (OpenAI-compatible chat API) ──────────────────────────────

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: usize,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

// ── HTTP implementation ──────────────────────────────────────────────────

/// reqwest-backed client for OpenAI-compatible completion endpoints.
///
/// Constructed per invocation from the invocation-scoped credential; the
/// credential lives only inside this value and is never logged or cached
/// process-wide.
#[derive(Debug)]
pub struct HttpCompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl HttpCompletionClient {
    /// Build a client from the invocation's config.
    ///
    /// Fails with [`AuditError::MissingCredentials`] when no API key is
    /// configured — checked here, before any request exists.
    pub fn from_config(config: &AuditConfig) -> Result<Self, AuditError> {
        let api_key = match config.api_key.as_deref() {
            Some(k) if !k.trim().is_empty() => k.to_string(),
            _ => return Err(AuditError::MissingCredentials),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| AuditError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &AuditRequest) -> Result<Completion, AuditError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuditError::ApiTimeout {
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    }
                } else {
                    AuditError::RequestFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            let detail = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(AuditError::AuthError { detail });
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(AuditError::ApiError {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| AuditError::MalformedResponse {
                    detail: e.to_string(),
                })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AuditError::MalformedResponse {
                detail: "response contained no choices".into(),
            })?;

        let usage = parsed.usage.unwrap_or_default();
        debug!(
            "Completion received: {} chars, {} in / {} out tokens, {:?}",
            choice.message.content.len(),
            usage.prompt_tokens,
            usage.completion_tokens,
            start.elapsed()
        );

        Ok(Completion {
            content: choice.message.content,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        })
    }
}
