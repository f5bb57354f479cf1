//! Gesso metadata query client
//!
//! Asks the Perplexity chat completions API for a painting's metadata and returns it as
//! [`RawMetadata`](gesso_types::RawMetadata). [`PerplexityClient`] implements
//! [`gesso_core::MetadataSource`], so it plugs straight into a `Generator`.
//!
//! ## Example Usage
//!
//! ```no_run
//! use gesso_query::{PerplexityClient, PerplexityConfig};
//! use gesso_core::FieldSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PerplexityClient::new(PerplexityConfig::from_env()?)?;
//! let fields = FieldSet::new(["year", "style"])?;
//! let raw = client.query_metadata("Olympia", "Édouard Manet", &fields)?;
//! println!("{} fields returned", raw.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod prompt;

pub use client::PerplexityClient;
pub use config::{ConfigError, PerplexityConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompt::{
    api_field_name, build_prompt, parse_completion, template_field_name,
    TEMPLATE_TO_API_FIELD_MAP,
};

/// Errors that can occur while querying the metadata service
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The HTTP client could not be initialised
    #[error("failed to build http client: {0}")]
    ClientBuild(reqwest::Error),

    /// The request did not reach the service or timed out
    #[error("failed to reach metadata service: {0}")]
    Transport(reqwest::Error),

    /// The service answered with a non-success status
    #[error("metadata service http error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a chat completion
    #[error("metadata service returned an invalid response: {0}")]
    InvalidResponse(reqwest::Error),

    /// The completion had no choices
    #[error("metadata service returned no choices")]
    NoChoices,

    /// The completion content was not JSON
    #[error("failed to parse JSON response: {0}")]
    InvalidJson(serde_json::Error),

    /// The completion content was JSON but not an object
    #[error("JSON response is not an object")]
    NotAnObject,
}
