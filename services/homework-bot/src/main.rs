//! Homework bot CLI
//!
//! Command-line interface for the homework review notification relay.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use homework_bot::{load_config, BotBuilder, Config, Credentials};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Relays homework review status changes to Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between polls (overrides config file)
    #[arg(long)]
    retry_period_seconds: Option<u64>,

    /// Dotenv file consulted for credentials the environment does not set
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, retry_period_seconds={:?}, log_level={:?}",
        args.config,
        args.retry_period_seconds,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(seconds) = args.retry_period_seconds {
        config.retry_period = Duration::from_secs(seconds);
    }

    let credentials = Credentials::from_env_and_file(&args.env_file)?;

    tracing::info!("Starting homework bot");
    tracing::info!("Endpoint: {}", config.endpoint);
    tracing::info!("Retry period: {:?}", config.retry_period);

    BotBuilder::new(config, credentials).build()?.start().await?;

    Ok(())
}
