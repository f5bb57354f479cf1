//! Blocking Perplexity chat completions client.

use crate::config::PerplexityConfig;
use crate::prompt::{build_prompt, parse_completion};
use crate::QueryError;
use gesso_core::{FieldSet, MetadataSource, Painting, SourceError};
use gesso_types::RawMetadata;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Resolves painting metadata through the Perplexity API.
pub struct PerplexityClient {
    config: PerplexityConfig,
    http: reqwest::blocking::Client,
}

impl PerplexityClient {
    /// # Errors
    ///
    /// Returns `QueryError::ClientBuild` if the HTTP client cannot be initialised.
    pub fn new(config: PerplexityConfig) -> Result<Self, QueryError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(QueryError::ClientBuild)?;

        Ok(Self { config, http })
    }

    /// Sends one chat completion request and returns the message content.
    fn complete(&self, prompt: &str) -> Result<String, QueryError> {
        let url = self.config.completions_url();
        let body = json!({
            "model": self.config.model(),
            "messages": [{ "role": "user", "content": prompt }],
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .map_err(QueryError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = resp.json().map_err(QueryError::InvalidResponse)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(QueryError::NoChoices)
    }

    /// Queries metadata for one painting.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` for transport failures, non-success statuses and responses that
    /// do not contain a JSON object.
    pub fn query_metadata(
        &self,
        title: &str,
        artist: &str,
        fields: &FieldSet,
    ) -> Result<RawMetadata, QueryError> {
        let prompt = build_prompt(title, artist, fields);
        tracing::debug!("querying {} for {} by {}", self.config.model(), title, artist);

        let content = self.complete(&prompt)?;
        parse_completion(&content, fields)
    }
}

impl MetadataSource for PerplexityClient {
    fn query(&self, painting: &Painting, fields: &FieldSet) -> Result<RawMetadata, SourceError> {
        Ok(self.query_metadata(painting.title.as_str(), painting.artist.as_str(), fields)?)
    }
}
