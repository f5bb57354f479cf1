use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gesso_core::{CoreConfig, Generator, today};
use gesso_query::{PerplexityClient, PerplexityConfig};

/// Reads an optional path override from the environment; blank values count as unset.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Main entry point for the Gesso runner
///
/// Generates one note per painting in the input list, with every setting taken from the
/// environment (a `.env` file is honoured).
///
/// # Environment Variables
/// - `PERPLEXITY_API_KEY`: API key for the metadata service (required)
/// - `PERPLEXITY_MODEL`: model name (default: "sonar-pro")
/// - `GESSO_INPUT`: painting list (default: "data/input.txt")
/// - `GESSO_OUTPUT_DIR`: directory for generated notes (default: "outputs/")
/// - `GESSO_CACHE_DIR`: directory for cached query results (default: ".cache")
/// - `GESSO_TEMPLATE`: note template (default: "data/example-template.md")
///
/// # Returns
/// * `Ok(())` - If the run completes; per-painting failures are logged and skipped
/// * `Err(anyhow::Error)` - If the API key is missing or the template is unusable
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("gesso=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = PerplexityClient::new(PerplexityConfig::from_env()?)?;
    let config = CoreConfig::from_overrides(
        env_path("GESSO_INPUT"),
        env_path("GESSO_OUTPUT_DIR"),
        env_path("GESSO_CACHE_DIR"),
        env_path("GESSO_TEMPLATE"),
    )?;

    tracing::info!("++ Starting Gesso run ({})", config.input_path().display());

    let generator = Generator::new(config, client)?;
    generator.run(&today());

    Ok(())
}
