//! Building the task set for a run.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{DateRange, RequestTask, Route};
use crate::ledger::RecordLedger;

use super::config::AcquireConfig;
use super::error::{AcquireError, ValidationError};

/// Reject windows that start before `today`.
pub fn check_start_date(window: &DateRange, today: NaiveDate) -> Result<(), ValidationError> {
    if window.first() < today {
        return Err(ValidationError::StartBeforeToday {
            start: window.first(),
            today,
        });
    }
    Ok(())
}

/// Every route on every travel date, searched on `search_date`.
///
/// Routes vary slowest, so tasks for one route are adjacent.
pub fn cross_product(routes: &[Route], window: &DateRange, search_date: NaiveDate) -> Vec<RequestTask> {
    routes
        .iter()
        .flat_map(|route| {
            window
                .days()
                .map(move |day| RequestTask::new(route, day, search_date))
        })
        .collect()
}

/// Plan the tasks for a run starting `today`.
///
/// Initializes the ledger when it does not exist yet. Otherwise, unless
/// repeats are allowed, drops tasks whose dedup key is already persisted.
pub fn plan_tasks(
    ledger: &RecordLedger,
    config: &AcquireConfig,
    today: NaiveDate,
) -> Result<Vec<RequestTask>, AcquireError> {
    check_start_date(&config.travel_dates, today)?;

    let tasks = cross_product(&config.routes, &config.travel_dates, today);
    info!(total = tasks.len(), "specified requests");

    let tasks = if !ledger.exists() {
        ledger.initialize()?;
        tasks
    } else if config.repeat_services {
        tasks
    } else {
        let known = ledger.load_keys()?;
        tasks
            .into_iter()
            .filter(|task| !known.contains(&task.dedup_key()))
            .collect()
    };

    info!(pending = tasks.len(), "requests pending");
    Ok(tasks)
}
