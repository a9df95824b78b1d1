//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use khpt_core::{ExamSite, Level};

/// Download Korean History Proficiency Test past papers.
///
/// Crawls the public exam archive, normalizes question papers and answer
/// sheets into a deterministic filename scheme, and saves them locally.
#[derive(Parser, Debug)]
#[command(name = "khpt-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Directory where files will be saved
    #[arg(long, default_value = "downloads")]
    pub dest: PathBuf,

    /// Limit the number of list pages to crawl (default: all pages)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Seconds to sleep between page and attachment fetches
    #[arg(long, default_value_t = 1.0, value_parser = parse_delay)]
    pub delay: f64,

    /// Filter by level (repeatable; default: both)
    #[arg(long, value_enum)]
    pub levels: Vec<LevelArg>,

    /// Skip files that already exist at the destination
    #[arg(long)]
    pub skip_existing: bool,

    /// Base URL of the exam archive (override for mirrors or testing)
    #[arg(long, default_value = ExamSite::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// CLI-facing spelling of the difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    /// 기본 tier.
    Basic,
    /// 심화 tier.
    Advanced,
}

/// Longest accepted inter-request delay, in seconds.
const MAX_DELAY_SECS: f64 = 3600.0;

/// Parses `--delay`, rejecting values `Duration::from_secs_f64` cannot
/// represent (negative, NaN, infinite, or absurdly large).
fn parse_delay(value: &str) -> Result<f64, String> {
    let delay: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !delay.is_finite() || delay < 0.0 || delay > MAX_DELAY_SECS {
        return Err(format!(
            "delay must be between 0 and {MAX_DELAY_SECS} seconds"
        ));
    }
    Ok(delay)
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Basic => Level::Basic,
            LevelArg::Advanced => Level::Advanced,
        }
    }
}
