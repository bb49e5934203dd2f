//! Herd ETL command line
//!
//! Runs the pipeline once and prints the run summary as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herd_etl::config::Config;

#[derive(Parser)]
#[command(name = "herd-etl")]
#[command(about = "Extract, normalize and reload records from the source API", long_about = None)]
struct Cli {
    /// Source API base URL
    #[arg(long, env = "HERD_SOURCE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline (default)
    Run,
    /// List every record id without fetching or loading
    Discover,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herd_etl=info,herd_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    info!(
        "Loaded configuration: base_url={}, max_concurrent={}, max_batch={}",
        config.base_url, config.max_concurrent_requests, config.max_records_per_batch
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let summary = herd_etl::run_pipeline(config).await?;
            let output =
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
            println!("{}", output);
        }
        Commands::Discover => {
            let ids = herd_etl::discover(config).await?;
            let output = serde_json::to_string(&ids).context("Failed to serialize ids")?;
            println!("{}", output);
        }
    }

    Ok(())
}
