//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses. Resolution therefore takes a lookup function instead of calling
//! `std::env::var` directly; binaries pass `|name| std::env::var(name).ok()`.

use crate::constants::{
    ENV_API_KEY, ENV_LLM_BASE_URL, ENV_LLM_MAX_RETRIES, ENV_LLM_MAX_TOKENS, ENV_LLM_MODEL,
    ENV_LLM_TEMPERATURE, ENV_LLM_TIMEOUT_SECS, ENV_MAX_UPLOAD_BYTES,
};
use crate::{PatientError, PatientResult};
use crms_files::DEFAULT_MAX_UPLOAD_BYTES;
use crms_llm::LlmSettings;
use std::str::FromStr;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    llm: LlmSettings,
    max_upload_bytes: u64,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidConfig` if the model settings are invalid or the upload
    /// limit is zero.
    pub fn new(llm: LlmSettings, max_upload_bytes: u64) -> PatientResult<Self> {
        llm.validate()
            .map_err(|e| PatientError::InvalidConfig(e.to_string()))?;

        if max_upload_bytes == 0 {
            return Err(PatientError::InvalidConfig(format!(
                "{ENV_MAX_UPLOAD_BYTES} must be greater than zero"
            )));
        }

        Ok(Self {
            llm,
            max_upload_bytes,
        })
    }

    pub fn llm(&self) -> &LlmSettings {
        &self.llm
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }
}

/// Resolve the full configuration from a variable lookup.
///
/// Unset or blank variables fall back to the defaults; `GROQ_API_KEY` has no default.
///
/// # Errors
///
/// Returns `PatientError::InvalidConfig` if the API key is missing, a value cannot be parsed,
/// or the resulting settings fail validation.
pub fn core_config_from_lookup<F>(lookup: F) -> PatientResult<CoreConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = non_blank(lookup(ENV_API_KEY)).ok_or_else(|| {
        PatientError::InvalidConfig(format!("{ENV_API_KEY} must be set"))
    })?;

    let defaults = LlmSettings::with_api_key(api_key);
    let llm = LlmSettings {
        api_base_url: non_blank(lookup(ENV_LLM_BASE_URL)).unwrap_or(defaults.api_base_url),
        model: non_blank(lookup(ENV_LLM_MODEL)).unwrap_or(defaults.model),
        temperature: parse_env_value(
            ENV_LLM_TEMPERATURE,
            lookup(ENV_LLM_TEMPERATURE),
            defaults.temperature,
        )?,
        max_tokens: parse_env_value(
            ENV_LLM_MAX_TOKENS,
            lookup(ENV_LLM_MAX_TOKENS),
            defaults.max_tokens,
        )?,
        timeout_secs: parse_env_value(
            ENV_LLM_TIMEOUT_SECS,
            lookup(ENV_LLM_TIMEOUT_SECS),
            defaults.timeout_secs,
        )?,
        max_retries: parse_env_value(
            ENV_LLM_MAX_RETRIES,
            lookup(ENV_LLM_MAX_RETRIES),
            defaults.max_retries,
        )?,
        api_key: defaults.api_key,
    };

    let max_upload_bytes = parse_env_value(
        ENV_MAX_UPLOAD_BYTES,
        lookup(ENV_MAX_UPLOAD_BYTES),
        DEFAULT_MAX_UPLOAD_BYTES,
    )?;

    CoreConfig::new(llm, max_upload_bytes)
}

/// Parse an optional variable value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
pub fn parse_env_value<T>(name: &str, value: Option<String>, default: T) -> PatientResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(value) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| {
            PatientError::InvalidConfig(format!("{name} has invalid value {raw:?}: {e}"))
        }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
