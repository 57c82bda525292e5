//! pubmetrics - PubMed publication metrics batch scraper
//!
//! Reads an author list (`Last, First`, one per line), collects each author's
//! publications, enriches every publication with SCImago journal metrics,
//! and writes pipe-delimited records, one blank line between author blocks.
//!
//! ## Usage
//!
//! ```bash
//! pubmetrics --input authors.txt --output metrics.txt
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pubmetrics::batch::{self, BatchOptions};
use pubmetrics::pubmed::SearchOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Collect per-author publication lists and journal impact metrics
#[derive(Parser)]
#[command(name = "pubmetrics")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Author list, one `Last, First` name per line
    #[arg(short, long, default_value = "authors.txt")]
    input: PathBuf,

    /// Pipe-delimited output file (open as a `|`-separated table)
    #[arg(short, long, default_value = "metrics.txt")]
    output: PathBuf,

    /// First publication year included in the search filter
    #[arg(long, default_value_t = 2011)]
    year_from: u16,

    /// Last publication year included in the search filter
    #[arg(long, default_value_t = 2020)]
    year_to: u16,

    /// Maximum search results requested per author
    #[arg(long, default_value_t = 200)]
    size: u32,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    let options = BatchOptions {
        input: cli.input,
        output: cli.output,
        search: SearchOptions {
            year_from: cli.year_from,
            year_to: cli.year_to,
            size: cli.size,
            base_url: None,
        },
    };

    batch::run(&options).await.context("batch run failed")?;

    Ok(())
}
