//! Round-trip matching.
//!
//! Reads both directions of a route from the ledger, pairs outbound trains
//! with returns a configured number of days later, and writes the cheapest
//! pairs ranked by total price.
//!
//! ```text
//! ledger ──load_trains──▶ outbound / return by date
//!        ──enumerate_combinations──▶ round trips
//!        ──select_cheapest + rank──▶ result file
//! ```

mod combine;
mod config;
mod error;
mod load;
mod output;
mod select;

pub use combine::{RoundTrip, enumerate_combinations};
pub use config::{DEFAULT_MIN_RESULTS, MatchConfig};
pub use error::MatchError;
pub use load::{OptionKey, TrainOption, load_trains};
pub use output::{RESULT_HEADER, write_results};
pub use select::{RankedTrip, rank, select_cheapest};

use tracing::info;

use crate::ledger::RecordLedger;

/// Counts from a matcher run, with the ranked trips.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub outbound_trains: usize,
    pub return_trains: usize,
    pub combinations: usize,
    pub ranked: Vec<RankedTrip>,
}

/// Find the cheapest round trips without writing anything.
pub fn find_round_trips(config: &MatchConfig) -> Result<MatchReport, MatchError> {
    let ledger = RecordLedger::new(&config.ledger_path);
    if !ledger.exists() {
        return Err(MatchError::LedgerMissing(config.ledger_path.clone()));
    }

    let route = &config.route;
    let outbound = load_trains(&ledger, &route.origin, &route.destination, &config.travel_dates)?;
    let inbound = load_trains(&ledger, &route.destination, &route.origin, &config.travel_dates)?;

    let trips = enumerate_combinations(&outbound, &inbound, &config.travel_dates, &config.trip_lengths);
    let combinations = trips.len();
    let ranked = rank(select_cheapest(trips, config.min_results));

    let report = MatchReport {
        outbound_trains: outbound.values().map(Vec::len).sum(),
        return_trains: inbound.values().map(Vec::len).sum(),
        combinations,
        ranked,
    };
    info!(
        origin = %route.origin,
        destination = %route.destination,
        outbound = report.outbound_trains,
        returns = report.return_trains,
        combinations,
        selected = report.ranked.len(),
        "matched round trips"
    );
    Ok(report)
}

/// Find the cheapest round trips and write them to the configured output.
pub fn run(config: &MatchConfig) -> Result<MatchReport, MatchError> {
    let report = find_round_trips(config)?;
    write_results(
        &config.output_path,
        &config.route.origin,
        &config.route.destination,
        &report.ranked,
    )?;
    info!(path = %config.output_path.display(), "wrote round trips");
    Ok(report)
}
