//! Offline dump of the forecast heat grid.
//!
//! Fetches the configured grid once and writes the samples as JSON
//! `[lat, lon, value]` triples.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use baltic_region::config::Config;
use baltic_region::heat::{normalize, HeatFetcher};

#[derive(Parser, Debug)]
#[command(name = "heatgrid")]
#[command(about = "Fetch the forecast heat grid and write it as JSON")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep raw temperatures instead of normalizing to 0..1
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let fetcher = HeatFetcher::new(&config.heat)?;
    let points = fetcher.load(&config.heat).await;

    if points.is_empty() {
        anyhow::bail!("No heat points could be fetched from {}", config.heat.endpoint);
    }

    let points = if args.raw { points } else { normalize(&points) };
    let json = serde_json::to_string_pretty(&points)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote {} heat points to {:?}", points.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
