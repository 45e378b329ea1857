//! Remaining-time estimates for a run.

use std::time::{Duration, Instant};

use tracing::info;

/// Estimate time left from the average time per completed task.
///
/// Returns `None` until at least one task has completed.
pub fn estimate_remaining(elapsed: Duration, completed: usize, remaining: usize) -> Option<Duration> {
    if completed == 0 {
        return None;
    }
    let per_task = elapsed.as_secs_f64() / completed as f64;
    Some(Duration::from_secs_f64(per_task * remaining as f64))
}

/// Whole minutes shown to the operator; always rounds up past zero.
pub fn display_minutes(remaining: Duration) -> u64 {
    remaining.as_secs() / 60 + 1
}

/// Tracks a run's start so each success can log an ETA.
#[derive(Debug, Clone)]
pub struct Progress {
    started: Instant,
    total: usize,
}

impl Progress {
    pub fn start(total: usize) -> Self {
        Self {
            started: Instant::now(),
            total,
        }
    }

    /// Log and return the estimate with `remaining` tasks left.
    pub fn report(&self, remaining: usize) -> Option<Duration> {
        let completed = self.total.saturating_sub(remaining);
        let eta = estimate_remaining(self.started.elapsed(), completed, remaining)?;
        info!(
            remaining,
            remaining_mins = display_minutes(eta),
            "acquisition progress"
        );
        Some(eta)
    }
}
