//! Provider that serves offers recorded in JSON files.
//!
//! Lets acquisition run end to end without a live booking site. Each route
//! and date has its own file in the fixture directory, named
//! `{origin}_{destination}_{YYYY-MM-DD}.json` and holding an array of offers.
//! Path separators and `%` in station names are percent-encoded so every
//! fixture stays directly inside the directory:
//!
//! ```json
//! [
//!   { "departure": "07:00", "arrival": "09:30", "price": "25,50" },
//!   { "departure": "08:15", "arrival": "10:45", "price": "Completo", "operator": "OUIGO" }
//! ]
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Fare, Offer, Operator, StationId, parse_hhmm};

use super::provider::{FailureKind, FetchOutcome, ServiceProvider};

/// An offer as written in a fixture file.
#[derive(Debug, Deserialize)]
struct RecordedOffer {
    departure: String,
    arrival: String,
    price: String,
    #[serde(default)]
    operator: Option<String>,
}

/// Replays recorded offers from a directory.
///
/// A missing file means the route had no services that day; an unreadable
/// or malformed one is a provider fault.
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    dir: PathBuf,
    operator: Operator,
}

impl ReplayProvider {
    /// Offers without their own operator are attributed to `operator`.
    pub fn new(dir: impl Into<PathBuf>, operator: Operator) -> Self {
        Self {
            dir: dir.into(),
            operator,
        }
    }

    /// Fixture file for one request.
    pub fn fixture_path(&self, origin: &StationId, destination: &StationId, travel_date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}_{}_{}.json",
            file_component(origin),
            file_component(destination),
            travel_date.format("%Y-%m-%d")
        ))
    }

    fn convert(&self, recorded: RecordedOffer) -> Result<Offer, String> {
        let operator = match recorded.operator {
            Some(name) => Operator::parse(&name).map_err(|e| e.to_string())?,
            None => self.operator.clone(),
        };
        Ok(Offer {
            departure: parse_hhmm(&recorded.departure).map_err(|e| e.to_string())?,
            arrival: parse_hhmm(&recorded.arrival).map_err(|e| e.to_string())?,
            fare: Fare::parse(&recorded.price),
            operator,
        })
    }

    async fn load(&self, path: &Path) -> FetchOutcome {
        let json = match tokio::fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no recorded offers");
                return FetchOutcome::Failure(FailureKind::NoOffers);
            }
            Err(e) => return FetchOutcome::fault(format!("failed to read {}: {e}", path.display())),
        };

        let recorded: Vec<RecordedOffer> = match serde_json::from_str(&json) {
            Ok(recorded) => recorded,
            Err(e) => return FetchOutcome::fault(format!("failed to parse {}: {e}", path.display())),
        };

        match recorded
            .into_iter()
            .map(|r| self.convert(r))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(offers) => FetchOutcome::Offers(offers),
            Err(e) => FetchOutcome::fault(format!("bad offer in {}: {e}", path.display())),
        }
    }
}

impl ServiceProvider for ReplayProvider {
    fn operator(&self) -> &Operator {
        &self.operator
    }

    async fn fetch(
        &self,
        origin: &StationId,
        destination: &StationId,
        travel_date: NaiveDate,
    ) -> FetchOutcome {
        let path = self.fixture_path(origin, destination, travel_date);
        self.load(&path).await
    }
}

fn file_component(station: &StationId) -> String {
    let mut out = String::with_capacity(station.as_str().len());
    for c in station.as_str().chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '\\' => out.push_str("%5C"),
            c => out.push(c),
        }
    }
    out
}
