//! OpenAI-compatible chat completion client (`/chat/completions`).
//!
//! All wire types are private to this module; callers only see [`ChatMessage`] in and a
//! `String` out. Each [`ChatModel::invoke`] is one logical request, retried on transient
//! failures according to [`LlmSettings::max_retries`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::retry::retry_with_backoff;
use crate::{ChatMessage, ChatModel, LlmError, LlmResult, LlmSettings};

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Client for any HTTP endpoint implementing `/chat/completions`.
///
/// Constructed once at startup and shared; `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    settings: LlmSettings,
    endpoint: String,
    retry_delay: Duration,
}

impl OpenAiCompatibleClient {
    /// Builds a client after validating `settings`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidSettings` for invalid settings and
    /// `LlmError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(settings: LlmSettings) -> LlmResult<Self> {
        settings.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| LlmError::ClientBuild(e.to_string()))?;

        let endpoint = settings.completions_url();
        info!(model = %settings.model, endpoint = %endpoint, "created LLM client");

        Ok(Self {
            client,
            settings,
            endpoint,
            retry_delay: INITIAL_RETRY_DELAY,
        })
    }

    /// Overrides the initial backoff delay between retries.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    async fn send_once(&self, payload: &ChatCompletionRequest<'_>) -> LlmResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.endpoint, error = %e, "LLM HTTP request failed (transport)");
                LlmError::Transport {
                    message: e.to_string(),
                    timeout: e.is_timeout(),
                }
            })?;

        let response = check_status(response).await?;

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "LLM token usage"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleClient {
    async fn invoke(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        let payload = ChatCompletionRequest {
            model: &self.settings.model,
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            model = %payload.model,
            messages = messages.len(),
            content_len = messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "sending LLM request"
        );

        let started = Instant::now();
        let result = retry_with_backoff(
            |attempt| {
                debug!(attempt, "LLM request attempt");
                self.send_once(&payload)
            },
            self.settings.max_retries,
            self.retry_delay,
        )
        .await;

        match &result {
            Ok(content) => info!(
                model = %self.settings.model,
                elapsed_ms = started.elapsed().as_millis() as u64,
                reply_len = content.len(),
                "received LLM response"
            ),
            Err(e) => error!(
                model = %self.settings.model,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "LLM request failed"
            ),
        }

        result
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Consume the response and return it if successful, or a status error carrying the
/// provider's message.
async fn check_status(response: reqwest::Response) -> LlmResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };

    Err(LlmError::Status {
        status: status.as_u16(),
        message,
    })
}
