//! Acquisition run configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{DateRange, Route};
use crate::ledger::default_missing_path;

/// Consecutive failures tolerated before a run gives up.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 20;

/// Order in which pending tasks are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Uniformly random among pending tasks.
    #[default]
    Random,

    /// Planning order; a failed task moves to the back of the queue.
    Sequential,
}

/// Configuration parameters for an acquisition run.
#[derive(Debug, Clone)]
pub struct AcquireConfig {
    /// Routes to request, each in the given direction only.
    pub routes: Vec<Route>,

    /// Travel dates to request for every route.
    pub travel_dates: DateRange,

    /// Request again routes and dates already searched today.
    pub repeat_services: bool,

    /// Give up once consecutive failures exceed this.
    pub failure_threshold: u32,

    pub selection: Selection,

    /// Ledger to append records to.
    pub ledger_path: PathBuf,

    /// Where to write the report if the run gives up.
    pub missing_path: PathBuf,
}

impl AcquireConfig {
    /// Create a config with default policy; the missing report goes beside
    /// the ledger.
    pub fn new(routes: Vec<Route>, travel_dates: DateRange, ledger_path: impl Into<PathBuf>) -> Self {
        let ledger_path = ledger_path.into();
        Self {
            routes,
            travel_dates,
            repeat_services: true,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            selection: Selection::default(),
            missing_path: default_missing_path(&ledger_path),
            ledger_path,
        }
    }

    pub fn with_repeat_services(mut self, repeat: bool) -> Self {
        self.repeat_services = repeat;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_missing_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing_path = path.into();
        self
    }
}
