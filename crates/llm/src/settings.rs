//! Protocol parameters for the hosted model.

use crate::{LlmError, LlmResult};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Settings for an OpenAI-compatible chat-completion endpoint.
///
/// Every field except `api_base_url` and `api_key` is forwarded to the provider as-is.
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    /// Base URL without the `/chat/completions` suffix.
    pub api_base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Additional attempts after the first one fails with a transient error.
    pub max_retries: u32,
}

impl LlmSettings {
    /// Settings with the default model parameters and the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Checks the settings before any request is made.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidSettings` if:
    /// - the base URL is not an http(s) URL,
    /// - the API key or model is blank,
    /// - the temperature is outside `0.0..=2.0`,
    /// - `max_tokens` or `timeout_secs` is zero.
    pub fn validate(&self) -> LlmResult<()> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(LlmError::InvalidSettings(format!(
                "api_base_url must start with http:// or https:// (got {:?})",
                self.api_base_url
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(LlmError::InvalidSettings("api_key cannot be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::InvalidSettings("model cannot be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::InvalidSettings(format!(
                "temperature must be between 0 and 2 (got {})",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(LlmError::InvalidSettings(
                "max_tokens must be greater than zero".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::InvalidSettings(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Full URL of the completions endpoint.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.api_base_url.trim().trim_end_matches('/')
        )
    }
}

// The API key stays out of logs.
impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LlmSettings::with_api_key("key");
        assert_eq!(settings.api_base_url, "https://api.groq.com/openai/v1");
        assert_eq!(settings.model, "llama-3.1-70b-versatile");
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.max_tokens, 8000);
        assert_eq!(settings.timeout_secs, 60);
        assert_eq!(settings.max_retries, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let mut settings = LlmSettings::with_api_key("key");
        settings.api_base_url = "http://localhost:8080/v1/".into();
        assert_eq!(
            settings.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = LlmSettings::with_api_key("key");

        let mut s = base.clone();
        s.api_key = "  ".into();
        assert!(matches!(s.validate(), Err(LlmError::InvalidSettings(_))));

        let mut s = base.clone();
        s.api_base_url = "ftp://example.com".into();
        assert!(matches!(s.validate(), Err(LlmError::InvalidSettings(_))));

        let mut s = base.clone();
        s.model = "".into();
        assert!(matches!(s.validate(), Err(LlmError::InvalidSettings(_))));

        let mut s = base.clone();
        s.temperature = 2.5;
        assert!(matches!(s.validate(), Err(LlmError::InvalidSettings(_))));

        let mut s = base.clone();
        s.temperature = f32::NAN;
        assert!(matches!(s.validate(), Err(LlmError::InvalidSettings(_))));

        let mut s = base.clone();
        s.max_tokens = 0;
        assert!(matches!(s.validate(), Err(LlmError::InvalidSettings(_))));

        let mut s = base;
        s.timeout_secs = 0;
        assert!(matches!(s.validate(), Err(LlmError::InvalidSettings(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = LlmSettings::with_api_key("gsk_secret");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
