use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use comment_harvest::{
    AggregationEngine, ApiCredential, Config, CsvWriter, ReportBuilder, YouTubeClient,
};

#[derive(Parser)]
#[command(name = "comment-harvest")]
#[command(version, about = "Scrape top-level YouTube comments into a single CSV file")]
struct Cli {
    /// Video IDs to scrape
    #[arg(required = true, value_name = "VIDEO_ID")]
    video_ids: Vec<String>,

    /// YouTube Data API key (falls back to the YOUTUBE_API_KEY environment variable)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Output directory for comments.csv
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Explicit configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("comment_harvest={},warn", level)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before the config is read; its log level is applied once loaded.
    let provisional = if cli.verbose { "debug" } else { "info" };
    let (filter, filter_handle) = reload::Layer::new(log_filter(provisional));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?.with_env_overrides(),
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(dir) = cli.output_dir {
        config.output.output_dir = dir;
    }

    let level = if cli.verbose { "debug" } else { config.output.log_level.as_str() };
    if let Err(e) = filter_handle.reload(log_filter(level)) {
        warn!("Could not apply log level {}: {}", level, e);
    }

    config.validate()?;
    debug!("{}", config.summary());

    let credential = match ApiCredential::resolve(cli.api_key) {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let client = YouTubeClient::new(&config.api, credential).context("Failed to build HTTP client")?;
    let engine = AggregationEngine::new(Arc::new(client), &config.scrape);

    info!("🚀 Starting to scrape comments from {} video(s)", cli.video_ids.len());
    let run = engine.run(&cli.video_ids).await;

    if run.failed_count() > 0 {
        warn!("⚠️ {} video(s) stopped early because of API errors", run.failed_count());
    }

    if run.table.is_empty() {
        warn!("No comments were collected from any videos.");
        return Ok(());
    }

    let saved_to = CsvWriter::new(&config.output)
        .write(&run.table)
        .context("Failed to write comments CSV")?;

    let rows = ReportBuilder::build(&run.table, &run.titles);
    for line in ReportBuilder::render(&rows, Some(&saved_to)).lines() {
        info!("{}", line);
    }

    Ok(())
}
