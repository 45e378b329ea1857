//! Report of services that could not be acquired.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::domain::{MissingService, Operator, format_date};

use super::error::StorageError;
use super::store::{DELIMITER, create_parent_dirs};

/// Column names of the missing-services report, in file order.
pub const MISSING_HEADER: [&str; 4] = [
    "origin_station",
    "destination_station",
    "operator",
    "travel_date",
];

/// File name used when no report path is configured.
pub const DEFAULT_MISSING_FILE: &str = "missing_services.txt";

/// Default report location: beside the ledger.
pub fn default_missing_path(ledger_path: &Path) -> PathBuf {
    match ledger_path.parent() {
        Some(dir) => dir.join(DEFAULT_MISSING_FILE),
        None => PathBuf::from(DEFAULT_MISSING_FILE),
    }
}

/// Write the report, replacing any previous one.
pub fn write_missing_services(
    path: &Path,
    operator: &Operator,
    services: &[MissingService],
) -> Result<(), StorageError> {
    create_parent_dirs(path)?;

    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(file);

    writer
        .write_record(MISSING_HEADER)
        .map_err(|e| StorageError::csv(path, e))?;

    for service in services {
        let travel_date = format_date(service.travel_date);
        writer
            .write_record([
                service.origin.as_str(),
                service.destination.as_str(),
                operator.as_str(),
                travel_date.as_str(),
            ])
            .map_err(|e| StorageError::csv(path, e))?;
    }

    writer.flush().map_err(|e| StorageError::io(path, e))?;
    writer
        .get_ref()
        .sync_data()
        .map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
