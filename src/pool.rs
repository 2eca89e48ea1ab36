//! Bounded-concurrency task runner with partial-failure tolerance.
//!
//! Items are dispatched in input order with at most `bound` futures in
//! flight. Each future's result is collected as it completes; failures are
//! logged and counted and never retried. The runner knows nothing about
//! HTTP or HTML, so it is shared by every source.

use crate::models::FetchOutcome;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::future::Future;
use tracing::{info, instrument, warn};

/// Run `task` over every item, keeping at most `bound` tasks in flight.
///
/// # Arguments
///
/// * `items` - Work items, dispatched in this order
/// * `bound` - Maximum number of tasks in flight; zero is treated as one
/// * `task` - Builds the future for one item from its zero-based input index
///   and the item itself
///
/// # Returns
///
/// A [`FetchOutcome`] with the successful results in completion order and
/// the number of tasks that returned an error.
#[instrument(level = "debug", skip_all, fields(total = items.len(), bound = bound))]
pub async fn run_bounded<I, T, F, Fut>(items: Vec<I>, bound: usize, mut task: F) -> FetchOutcome<T>
where
    F: FnMut(usize, I) -> Fut,
    Fut: Future<Output = Result<T, Box<dyn Error>>>,
{
    let total = items.len();
    let bound = bound.max(1);
    let mut outcome = FetchOutcome::default();

    let mut in_flight = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| {
            info!("{}/{}", index + 1, total);
            let fut = task(index, item);
            async move { (index, fut.await) }
        })
        .buffer_unordered(bound);

    while let Some((index, result)) = in_flight.next().await {
        match result {
            Ok(value) => outcome.results.push(value),
            Err(e) => {
                outcome.error_count += 1;
                warn!(index, error = %e, "Task failed; dropping item");
            }
        }
    }

    outcome
}
