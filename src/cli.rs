//! Command-line interface definitions.
//!
//! The output directory is the only required argument. Every option can
//! also be set through an environment variable.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which news sources to harvest.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceChoice {
    Interfax,
    Rbc,
    All,
}

impl SourceChoice {
    pub fn includes_interfax(self) -> bool {
        matches!(self, SourceChoice::Interfax | SourceChoice::All)
    }

    pub fn includes_rbc(self) -> bool {
        matches!(self, SourceChoice::Rbc | SourceChoice::All)
    }
}

/// Harvest Interfax and RBC news day by day, newest first.
///
/// # Examples
///
/// ```sh
/// # Both sources, forever
/// ru_news_harvest ./news
///
/// # Only RBC, back to the start of 2024
/// ru_news_harvest ./news --source rbc --until 2024-01-01
///
/// # Count what is already on disk
/// ru_news_harvest ./news --stats
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory receiving one JSON file per source per day
    pub output_dir: PathBuf,

    /// Source to harvest
    #[arg(short, long, value_enum, env = "NEWS_SOURCE", default_value = "all")]
    pub source: SourceChoice,

    /// Oldest day to harvest (YYYY-MM-DD, inclusive); runs forever when unset
    #[arg(long, env = "NEWS_UNTIL")]
    pub until: Option<NaiveDate>,

    /// Stop after this many days per source
    #[arg(long, env = "NEWS_MAX_DAYS")]
    pub max_days: Option<usize>,

    /// Article request timeout in milliseconds (RBC defaults to 3000, Interfax to none)
    #[arg(long, env = "NEWS_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Attempts per day before moving on to the previous day
    #[arg(long, env = "NEWS_RETRIES", default_value_t = 3)]
    pub retries: usize,

    /// Print per-source day and article counts for OUTPUT_DIR and exit without harvesting
    #[arg(long)]
    pub stats: bool,
}
