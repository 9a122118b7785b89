use agriscan::config::{Config, BACKEND_URL_ENV};
use agriscan::transport::cli::{self, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    env!("AGRISCAN_VERSION_SUFFIX")
);

#[derive(Parser)]
#[command(name = "agriscan")]
#[command(author, version = VERSION, about = "AgriScan - plant disease detection client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Inference service address (overrides config and AGRISCAN_BACKEND_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a leaf photo for diagnosis
    Scan {
        /// Image file (JPEG, PNG, GIF or WebP, up to 25MB)
        image: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show past predictions with summary statistics
    History {
        /// Number of predictions to fetch (default from config: 20)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Number of most recent predictions to skip
        #[arg(long, default_value = "0")]
        skip: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Check that the inference service is up
    Health,

    /// Show the effective configuration
    Config {
        /// Write the configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "agriscan=debug"
    } else {
        "agriscan=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        })
        .with_overrides(cli.api_url, std::env::var(BACKEND_URL_ENV).ok());
    tracing::debug!("Using inference service at {}", config.api.base_url);

    match cli.command {
        Commands::Scan { image, format } => {
            cli::run_scan(&config, &image, format).await?;
        }
        Commands::History {
            limit,
            skip,
            format,
        } => {
            cli::run_history(&config, limit, skip, format).await?;
        }
        Commands::Health => {
            cli::run_health(&config).await?;
        }
        Commands::Config { init } => {
            cli::run_config(&config, init)?;
        }
    }

    Ok(())
}
