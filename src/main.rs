//! CLI entry point for the KHPT downloader.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use khpt_core::{DownloadOptions, ExamSite, Level, download_past_exams};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let site = ExamSite::new(&args.base_url);
    let levels = if args.levels.is_empty() {
        None
    } else {
        Some(args.levels.iter().map(|l| Level::from(*l)).collect::<HashSet<_>>())
    };

    let options = DownloadOptions {
        max_pages: args.max_pages,
        skip_existing: args.skip_existing,
        // The CLI parser guarantees a finite, bounded, non-negative value
        delay: Duration::from_secs_f64(args.delay),
        levels,
        ..DownloadOptions::default()
    };

    let downloaded = download_past_exams(&site, &args.dest, &options).await?;

    info!(
        "Finished. Downloaded {downloaded} new file(s) to {}",
        args.dest.display()
    );

    Ok(())
}
