//! Trend Radar
//!
//! Runs one cycle: fetch every configured hot list, store the snapshot,
//! and print a keyword-grouped report of the day so far.

mod config;
mod cycle;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::RadarConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,radar_cli=debug")),
        )
        .init();

    let config = RadarConfig::from_env()?;
    info!(
        "Starting trend radar: {} platforms, {} mode, output in {}",
        config.platforms.len(),
        config.report_mode,
        config.output_dir.display()
    );

    let text = cycle::run_cycle(&config).await?;
    println!("{}", text);

    Ok(())
}
