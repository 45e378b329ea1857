//! Configuration file.
//!
//! One TOML file configures both jobs, each in its own table:
//!
//! ```toml
//! [acquire]
//! ledger_path = "data/trains.txt"
//! travel_dates = "01/06/2026-30/06/2026"
//! replay_dir = "data/replay"
//! operator = "AVLO"
//!
//! [[acquire.routes]]
//! origin = "Madrid"
//! destination = "Barcelona"
//!
//! [matcher]
//! ledger_path = "data/trains.txt"
//! output_path = "data/round_trips.txt"
//! origin = "Madrid"
//! destination = "Barcelona"
//! travel_dates = "01/06/2026-30/06/2026"
//! trip_lengths = [2, 3, 4]
//! ```
//!
//! Raw values are checked when converted into [`AcquireSettings`] and
//! [`MatchConfig`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::acquire::{AcquireConfig, DEFAULT_FAILURE_THRESHOLD, Selection};
use crate::domain::{
    DateError, DateRange, DateRangeError, InvalidOperator, InvalidStation, Operator, Route,
    StationId,
};
use crate::matcher::{DEFAULT_MIN_RESULTS, MatchConfig};

/// Errors loading or checking the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config has no [{0}] table")]
    MissingSection(&'static str),

    #[error("invalid travel dates: {0}")]
    InvalidDateRange(DateRangeError),

    #[error(transparent)]
    InvalidDate(DateError),

    #[error("{value:?}: {source}")]
    InvalidStation {
        value: String,
        source: InvalidStation,
    },

    #[error("{value:?}: {source}")]
    InvalidOperator {
        value: String,
        source: InvalidOperator,
    },

    #[error("no routes configured")]
    NoRoutes,

    #[error("no trip lengths configured")]
    NoTripLengths,
}

impl From<DateRangeError> for ConfigError {
    fn from(e: DateRangeError) -> Self {
        match e {
            DateRangeError::Date(date) => ConfigError::InvalidDate(date),
            other => ConfigError::InvalidDateRange(other),
        }
    }
}

fn station(value: &str) -> Result<StationId, ConfigError> {
    StationId::parse(value).map_err(|source| ConfigError::InvalidStation {
        value: value.to_string(),
        source,
    })
}

fn default_true() -> bool {
    true
}

fn default_failure_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

fn default_min_results() -> usize {
    DEFAULT_MIN_RESULTS
}

/// The whole file, as written.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub acquire: Option<AcquireSection>,
    pub matcher: Option<MatcherSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub origin: String,
    pub destination: String,
}

/// The `[acquire]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcquireSection {
    pub ledger_path: PathBuf,
    pub missing_path: Option<PathBuf>,
    /// `DD/MM/YYYY-DD/MM/YYYY`, both ends inclusive.
    pub travel_dates: String,
    #[serde(default = "default_true")]
    pub repeat_services: bool,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default)]
    pub selection: Selection,
    /// Directory of recorded offers to replay.
    pub replay_dir: PathBuf,
    pub operator: String,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// The `[matcher]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherSection {
    pub ledger_path: PathBuf,
    pub output_path: PathBuf,
    pub origin: String,
    pub destination: String,
    pub travel_dates: String,
    pub trip_lengths: Vec<u32>,
    #[serde(default = "default_min_results")]
    pub min_results: usize,
}

/// A checked `[acquire]` table.
#[derive(Debug, Clone)]
pub struct AcquireSettings {
    pub config: AcquireConfig,
    pub replay_dir: PathBuf,
    pub operator: Operator,
}

impl ConfigFile {
    /// Parse configuration from TOML text.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    pub fn acquire(&self) -> Result<AcquireSettings, ConfigError> {
        self.acquire
            .as_ref()
            .ok_or(ConfigError::MissingSection("acquire"))?
            .to_settings()
    }

    pub fn matcher(&self) -> Result<MatchConfig, ConfigError> {
        self.matcher
            .as_ref()
            .ok_or(ConfigError::MissingSection("matcher"))?
            .to_config()
    }
}

impl AcquireSection {
    pub fn to_settings(&self) -> Result<AcquireSettings, ConfigError> {
        if self.routes.is_empty() {
            return Err(ConfigError::NoRoutes);
        }
        let routes = self
            .routes
            .iter()
            .map(|r| Ok(Route::new(station(&r.origin)?, station(&r.destination)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let travel_dates: DateRange = self.travel_dates.parse()?;
        let operator = Operator::parse(&self.operator).map_err(|source| ConfigError::InvalidOperator {
            value: self.operator.clone(),
            source,
        })?;

        let mut config = AcquireConfig::new(routes, travel_dates, &self.ledger_path)
            .with_repeat_services(self.repeat_services)
            .with_failure_threshold(self.failure_threshold)
            .with_selection(self.selection);
        if let Some(path) = &self.missing_path {
            config = config.with_missing_path(path);
        }

        Ok(AcquireSettings {
            config,
            replay_dir: self.replay_dir.clone(),
            operator,
        })
    }
}

impl MatcherSection {
    pub fn to_config(&self) -> Result<MatchConfig, ConfigError> {
        if self.trip_lengths.is_empty() {
            return Err(ConfigError::NoTripLengths);
        }
        let route = Route::new(station(&self.origin)?, station(&self.destination)?);
        let travel_dates: DateRange = self.travel_dates.parse()?;

        Ok(MatchConfig::new(
            route,
            travel_dates,
            self.trip_lengths.clone(),
            &self.ledger_path,
            &self.output_path,
        )
        .with_min_results(self.min_results))
    }
}
