//! Backward walk over calendar days for one source.
//!
//! The cursor starts at "now" (or local midnight for sources that ask for
//! it) and moves back one calendar day after every day, whether that day
//! succeeded, was skipped, or failed after all retries. Steps are taken on
//! the local calendar, so a 23 or 25 hour day at a DST change is still
//! visited exactly once. Without a stop condition the
//! walk never ends.

use crate::harvester::harvest_day;
use crate::models::HarvestStatus;
use crate::retry::RetryPolicy;
use crate::scrapers::NewsSource;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// When the driver should stop walking back.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopCondition {
    /// Oldest day to harvest, inclusive.
    pub earliest: Option<NaiveDate>,
    /// Maximum number of days to visit.
    pub max_days: Option<usize>,
}

impl StopCondition {
    pub fn should_stop(&self, cursor: &DateTime<Local>, days_visited: usize) -> bool {
        let too_old = self
            .earliest
            .is_some_and(|earliest| cursor.date_naive() < earliest);
        let enough = self.max_days.is_some_and(|max| days_visited >= max);
        too_old || enough
    }
}

/// Counters for a finished (or stopped) walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    pub days: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub articles: usize,
    pub article_errors: usize,
}

/// Map a wall-clock time onto `tz`. A time inside a DST gap is moved one
/// hour later; an ambiguous time resolves to its earlier instant.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local).earliest().or_else(|| {
        local
            .checked_add_signed(Duration::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
    })
}

/// Where the walk starts: `now` itself, or the start of its local day.
pub fn start_cursor(now: DateTime<Local>, floor_to_midnight: bool) -> DateTime<Local> {
    if !floor_to_midnight {
        return now;
    }
    resolve_local(&Local, now.date_naive().and_time(NaiveTime::MIN)).unwrap_or(now)
}

/// The cursor for the calendar day before `cursor`.
///
/// Steps the local calendar date and keeps the wall-clock time of `cursor`,
/// or local midnight when `floor_to_midnight` is set.
pub fn previous_day<Tz: TimeZone>(cursor: &DateTime<Tz>, floor_to_midnight: bool) -> DateTime<Tz> {
    let local = cursor.naive_local();
    let time = if floor_to_midnight { NaiveTime::MIN } else { local.time() };

    local
        .date()
        .pred_opt()
        .and_then(|day| resolve_local(&cursor.timezone(), day.and_time(time)))
        .unwrap_or_else(|| cursor.clone() - Duration::days(1))
}

pub struct DateDriver<'a, S> {
    source: &'a S,
    output_dir: PathBuf,
    retry: RetryPolicy,
    stop: StopCondition,
}

impl<'a, S: NewsSource> DateDriver<'a, S> {
    pub fn new(source: &'a S, output_dir: &Path, retry: RetryPolicy, stop: StopCondition) -> Self {
        Self {
            source,
            output_dir: output_dir.to_path_buf(),
            retry,
            stop,
        }
    }

    /// Walk back from `start` until the stop condition holds.
    #[instrument(level = "info", skip_all, fields(source = self.source.config().name))]
    pub async fn run(&self, start: DateTime<Local>) -> DriverSummary {
        let mut summary = DriverSummary::default();
        let mut cursor = start;
        let source = self.source;
        let output_dir = self.output_dir.as_path();
        let floor = source.config().floor_to_midnight;

        info!(start = %cursor, stop = ?self.stop, "Starting backward walk");

        while !self.stop.should_stop(&cursor, summary.days) {
            let day = cursor.date_naive().to_string();
            let result = self
                .retry
                .run(&day, move || harvest_day(source, output_dir, cursor))
                .await;

            match result {
                Ok(HarvestStatus::Saved { path, articles, errors }) => {
                    debug!(path = %path.display(), articles, errors, "Day saved");
                    summary.saved += 1;
                    summary.articles += articles;
                    summary.article_errors += errors;
                }
                Ok(HarvestStatus::Skipped { path }) => {
                    debug!(path = %path.display(), "Day already on disk");
                    summary.skipped += 1;
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(%day, attempts = self.retry.max_attempts(), error = %e, "Giving up on day; moving to previous day");
                }
            }

            summary.days += 1;
            cursor = previous_day(&cursor, floor);
        }

        info!(?summary, "Backward walk finished");
        summary
    }
}
