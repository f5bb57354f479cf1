//! Query client configuration.

use std::time::Duration;

pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";
pub const MODEL_ENV: &str = "PERPLEXITY_MODEL";
pub const BASE_URL_ENV: &str = "PERPLEXITY_BASE_URL";

pub const DEFAULT_MODEL: &str = "sonar-pro";
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PERPLEXITY_API_KEY is not set. Export it or add it to your .env file.")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings of the Perplexity chat completions client.
#[derive(Clone)]
pub struct PerplexityConfig {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

// Keeps the API key out of logs.
impl std::fmt::Debug for PerplexityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerplexityConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_base_url(base_url: &str) -> Result<String, ConfigError> {
    let base_url = base_url.trim_end_matches('/');
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "{BASE_URL_ENV} must start with http:// or https:// (got {base_url})"
        )));
    }
    Ok(base_url.to_string())
}

impl PerplexityConfig {
    /// Creates a configuration with the default model, base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if `api_key` is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_env_values(Some(api_key.into()), None, None)
    }

    /// Reads the configuration from `PERPLEXITY_API_KEY`, `PERPLEXITY_MODEL` and
    /// `PERPLEXITY_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if the API key is unset or blank, and
    /// `ConfigError::Invalid` for a malformed base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_values(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        )
    }

    /// Builds the configuration from already-read environment values.
    ///
    /// Blank values count as unset.
    pub fn from_env_values(
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = non_blank(api_key).ok_or(ConfigError::MissingApiKey)?;
        let model = non_blank(model).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = normalize_base_url(
            &non_blank(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
