//! # CRMS LLM
//!
//! Client for hosted chat-completion models.
//!
//! This crate contains:
//! - The [`ChatModel`] trait the rest of the workspace programs against
//! - [`OpenAiCompatibleClient`], an implementation for any `/chat/completions` endpoint
//!   (Groq by default)
//! - [`LlmSettings`], the protocol parameters passed through unchanged to the provider
//!
//! **No prompt concerns**: what is asked of the model belongs in `crms-core`.

#![warn(rust_2018_idioms)]

mod client;
mod message;
mod retry;
mod settings;

pub use client::OpenAiCompatibleClient;
pub use message::{ChatMessage, Role};
pub use retry::retry_with_backoff;
pub use settings::{
    LlmSettings, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid LLM settings: {0}")]
    InvalidSettings(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("request failed: {message}")]
    Transport { message: String, timeout: bool },
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to parse response body: {0}")]
    Decode(String),
    #[error("empty or missing content in response")]
    EmptyResponse,
}

impl LlmError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures (including timeouts), rate limiting and server-side errors are
    /// transient; everything else is returned to the caller straight away.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport { .. } => true,
            LlmError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// A model that turns a conversation into a single text reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends `messages` and returns the content of the model's reply.
    async fn invoke(&self, messages: &[ChatMessage]) -> LlmResult<String>;

    /// Name of the model answering requests, for logging.
    fn model_name(&self) -> &str;
}
