//! Round-trip result file.

use std::fs::File;
use std::path::Path;

use crate::domain::{StationId, format_date, format_hhmm};
use crate::ledger::{DELIMITER, StorageError, create_parent_dirs};

use super::load::TrainOption;
use super::select::RankedTrip;

/// Column names of the result file, in file order.
pub const RESULT_HEADER: [&str; 16] = [
    "rank",
    "total_price",
    "outbound_company",
    "outbound_price",
    "outbound_departure",
    "outbound_arrival",
    "outbound_date",
    "outbound_search_date",
    "outbound_origin",
    "return_company",
    "return_price",
    "return_departure",
    "return_arrival",
    "return_date",
    "return_search_date",
    "return_origin",
];

fn leg_columns(leg: &TrainOption, from: &StationId) -> [String; 7] {
    [
        leg.operator.to_string(),
        leg.price.to_string(),
        format_hhmm(leg.departure),
        format_hhmm(leg.arrival),
        format_date(leg.travel_date),
        format_date(leg.search_date),
        from.to_string(),
    ]
}

/// Write ranked trips from `origin` to `destination` and back, replacing
/// any previous file.
pub fn write_results(
    path: &Path,
    origin: &StationId,
    destination: &StationId,
    ranked: &[RankedTrip],
) -> Result<(), StorageError> {
    create_parent_dirs(path)?;

    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(file);

    writer
        .write_record(RESULT_HEADER)
        .map_err(|e| StorageError::csv(path, e))?;

    for entry in ranked {
        let mut row = vec![entry.rank.to_string(), entry.trip.total.to_string()];
        row.extend(leg_columns(&entry.trip.outbound, origin));
        row.extend(leg_columns(&entry.trip.inbound, destination));
        writer
            .write_record(&row)
            .map_err(|e| StorageError::csv(path, e))?;
    }

    writer.flush().map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
