use anyhow::Context;
use clap::{Parser, Subcommand};
use gesso_core::constants::DEFAULT_INPUT_PATH;
use gesso_core::{
    parse_input_file, today, CoreConfig, FieldSet, Generator, Painting, TemplateSpec,
};
use gesso_query::{PerplexityClient, PerplexityConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gesso")]
#[command(about = "Generate painting notes from a plain-text list")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one note per painting in the input list
    Generate {
        /// Painting list (default: data/input.txt)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory for generated notes (default: outputs/)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory for cached query results (default: .cache)
        #[arg(long)]
        cache: Option<PathBuf>,
        /// Note template (default: data/example-template.md)
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Show the fields a template requests
    Fields {
        /// Note template (default: data/example-template.md)
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Show the entries parsed from a painting list
    Parse {
        /// Painting list (default: data/input.txt)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gesso=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}

/// Fields the template at `template` (or the default template) requests.
fn template_fields(template: Option<PathBuf>) -> anyhow::Result<FieldSet> {
    let config = CoreConfig::from_overrides(None, None, None, template)?;
    let spec = TemplateSpec::load(config.template_path())?;
    let fields = spec
        .field_set()
        .with_context(|| format!("reading fields of {}", config.template_path().display()))?;
    Ok(fields)
}

/// Paintings listed in `input` (or the default list). Malformed lines are logged and skipped.
fn list_paintings(input: Option<PathBuf>) -> anyhow::Result<Vec<Painting>> {
    let path = input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH));
    parse_input_file(&path).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate {
            input,
            output,
            cache,
            template,
        }) => {
            let client = PerplexityClient::new(PerplexityConfig::from_env()?)?;
            let config = CoreConfig::from_overrides(input, output, cache, template)?;
            let generator = Generator::new(config, client)?;

            let summary = generator.run(&today());
            println!("Processed {} paintings", summary.total);
            println!("  Cache hits: {}", summary.cache_hits);
            println!("  Queries:    {}", summary.queries);
            println!("  Written:    {}", summary.written);
            println!("  Skipped:    {}", summary.skipped);
        }
        Some(Commands::Fields { template }) => {
            for field in template_fields(template)?.iter() {
                println!("{}", field);
            }
        }
        Some(Commands::Parse { input }) => {
            let paintings = list_paintings(input)?;
            if paintings.is_empty() {
                println!("No paintings found.");
            }
            for painting in paintings {
                println!(
                    "{}: {} by {}",
                    painting.number, painting.title, painting.artist
                );
            }
        }
        None => {
            println!("Use 'gesso --help' for commands");
        }
    }

    Ok(())
}
