//! Round-trip matcher configuration.

use std::path::PathBuf;

use crate::domain::{DateRange, Route};

/// Minimum number of round trips reported when that many exist.
pub const DEFAULT_MIN_RESULTS: usize = 50;

/// Configuration parameters for a matcher run.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Outbound direction; returns travel the reverse.
    pub route: Route,

    /// Both legs must travel on dates in this window.
    pub travel_dates: DateRange,

    /// Allowed days between outbound and return. Zero is a same-day return.
    pub trip_lengths: Vec<u32>,

    pub min_results: usize,

    pub ledger_path: PathBuf,

    pub output_path: PathBuf,
}

impl MatchConfig {
    pub fn new(
        route: Route,
        travel_dates: DateRange,
        trip_lengths: Vec<u32>,
        ledger_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            route,
            travel_dates,
            trip_lengths,
            min_results: DEFAULT_MIN_RESULTS,
            ledger_path: ledger_path.into(),
            output_path: output_path.into(),
        }
    }

    pub fn with_min_results(mut self, min_results: usize) -> Self {
        self.min_results = min_results;
        self
    }
}
