//! Pipe-delimited, append-only record ledger.
//!
//! The ledger is a text file with one trip record per line under a fixed
//! header. Existing ledgers written by earlier tooling must stay readable,
//! so the column order, the `|` delimiter and the `DD/MM/YYYY` date format
//! are part of the contract.

use std::collections::{BTreeMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    DedupKey, Fare, Operator, StationId, TripRecord, format_date, format_hhmm, parse_date,
    parse_hhmm,
};

use super::error::{RowError, StorageError};

/// Column names of the ledger, in file order.
pub const LEDGER_HEADER: [&str; 9] = [
    "origin_station",
    "destination_station",
    "travel_date",
    "departure_time",
    "arrival_time",
    "price",
    "company",
    "search_date",
    "search_time",
];

pub(crate) const DELIMITER: u8 = b'|';

/// One ledger line, as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerRow {
    origin_station: String,
    destination_station: String,
    travel_date: String,
    departure_time: String,
    arrival_time: String,
    price: String,
    company: String,
    search_date: String,
    search_time: String,
}

impl From<&TripRecord> for LedgerRow {
    fn from(record: &TripRecord) -> Self {
        Self {
            origin_station: record.origin.to_string(),
            destination_station: record.destination.to_string(),
            travel_date: format_date(record.travel_date),
            departure_time: format_hhmm(record.departure),
            arrival_time: format_hhmm(record.arrival),
            price: record.fare.to_string(),
            company: record.operator.to_string(),
            search_date: format_date(record.search_date),
            search_time: format_hhmm(record.search_time),
        }
    }
}

impl TryFrom<LedgerRow> for TripRecord {
    type Error = RowError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        Ok(TripRecord {
            origin: StationId::parse(&row.origin_station)?,
            destination: StationId::parse(&row.destination_station)?,
            travel_date: parse_date(&row.travel_date)?,
            departure: parse_hhmm(&row.departure_time)?,
            arrival: parse_hhmm(&row.arrival_time)?,
            fare: Fare::parse(&row.price),
            operator: Operator::parse(&row.company)?,
            search_date: parse_date(&row.search_date)?,
            search_time: parse_hhmm(&row.search_time)?,
        })
    }
}

impl LedgerRow {
    fn dedup_key(&self) -> Result<DedupKey, RowError> {
        Ok(DedupKey {
            origin: StationId::parse(&self.origin_station)?,
            destination: StationId::parse(&self.destination_station)?,
            travel_date: parse_date(&self.travel_date)?,
            search_date: parse_date(&self.search_date)?,
        })
    }
}

/// Handle on a ledger file.
///
/// Reads open the file afresh each time; appends go through a
/// [`LedgerWriter`].
#[derive(Debug, Clone)]
pub struct RecordLedger {
    path: PathBuf,
}

impl RecordLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the ledger file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the file exists and starts with the ledger header.
    pub fn exists(&self) -> bool {
        let Ok(file) = File::open(&self.path) else {
            return false;
        };
        let mut first = String::new();
        if BufReader::new(file).read_line(&mut first).is_err() {
            return false;
        }
        first.trim_end_matches(['\r', '\n']) == LEDGER_HEADER.join("|")
    }

    /// Create the ledger file holding only the header.
    ///
    /// Creates parent directories if they don't exist. Refuses to replace a
    /// non-empty file.
    pub fn initialize(&self) -> Result<(), StorageError> {
        if let Ok(meta) = std::fs::metadata(&self.path)
            && meta.len() > 0
        {
            return Err(StorageError::NotALedger {
                path: self.path.clone(),
            });
        }

        create_parent_dirs(&self.path)?;

        let file = File::create(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_writer(file);
        writer
            .write_record(LEDGER_HEADER)
            .map_err(|e| StorageError::csv(&self.path, e))?;
        writer
            .flush()
            .map_err(|e| StorageError::io(&self.path, e))?;

        debug!(path = %self.path.display(), "initialized ledger");
        Ok(())
    }

    /// Open the ledger for appending. The ledger must already be initialized.
    pub fn open_writer(&self) -> Result<LedgerWriter, StorageError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::io(&self.path, e))?;

        let writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(file);

        Ok(LedgerWriter {
            writer,
            path: self.path.clone(),
            appended: 0,
        })
    }

    /// Dedup keys of every persisted record.
    ///
    /// Rebuilt from the whole file on each call.
    pub fn load_keys(&self) -> Result<HashSet<DedupKey>, StorageError> {
        let mut keys = HashSet::new();
        self.for_each_row(|line, row| match row.dedup_key() {
            Ok(key) => {
                keys.insert(key);
            }
            Err(e) => warn!(line, error = %e, "skipping ledger row with unreadable key"),
        })?;
        Ok(keys)
    }

    /// Records for one direction on the given travel dates, grouped by date
    /// in file order.
    ///
    /// Records whose price is not numeric are not real offers and are left
    /// out.
    pub fn load_filtered(
        &self,
        origin: &StationId,
        destination: &StationId,
        dates: &HashSet<NaiveDate>,
    ) -> Result<BTreeMap<NaiveDate, Vec<TripRecord>>, StorageError> {
        let mut by_date: BTreeMap<NaiveDate, Vec<TripRecord>> = BTreeMap::new();

        self.for_each_row(|line, row| {
            let record = match TripRecord::try_from(row) {
                Ok(record) => record,
                Err(e) => {
                    warn!(line, error = %e, "skipping malformed ledger row");
                    return;
                }
            };

            if &record.origin != origin
                || &record.destination != destination
                || !dates.contains(&record.travel_date)
            {
                return;
            }

            if let Fare::Unavailable(text) = &record.fare {
                debug!(line, price = %text, "skipping record without numeric price");
                return;
            }

            by_date.entry(record.travel_date).or_default().push(record);
        })?;

        Ok(by_date)
    }

    /// Feed every decodable row to `f` with its line number.
    ///
    /// Rows with the wrong number of columns are skipped with a warning;
    /// I/O failures abort the read.
    fn for_each_row(&self, mut f: impl FnMut(u64, LedgerRow)) -> Result<(), StorageError> {
        let file = File::open(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| StorageError::csv(&self.path, e))?
            .clone();

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(StorageError::csv(&self.path, e)),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "skipping unreadable ledger row");
                    continue;
                }
            };

            let line = record.position().map(|p| p.line()).unwrap_or_default();
            match record.deserialize::<LedgerRow>(Some(&headers)) {
                Ok(row) => f(line, row),
                Err(e) => warn!(line, error = %e, "skipping unreadable ledger row"),
            }
        }

        Ok(())
    }
}

/// Append-only writer over an initialized ledger.
///
/// Every append is flushed and synced before it returns. Dropping the
/// writer flushes it as well.
pub struct LedgerWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    appended: usize,
}

impl LedgerWriter {
    /// Durably add one record.
    pub fn append(&mut self, record: &TripRecord) -> Result<(), StorageError> {
        self.writer
            .serialize(LedgerRow::from(record))
            .map_err(|e| StorageError::csv(&self.path, e))?;
        self.writer
            .flush()
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.writer
            .get_ref()
            .sync_data()
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.appended += 1;
        Ok(())
    }

    /// Number of records appended through this writer.
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Flush and close, returning the number of records appended.
    pub fn close(mut self) -> Result<usize, StorageError> {
        self.writer
            .flush()
            .map_err(|e| StorageError::io(&self.path, e))?;
        Ok(self.appended)
    }
}

/// Destination for records as acquisition produces them.
pub trait RecordSink {
    fn append(&mut self, record: &TripRecord) -> Result<(), StorageError>;

    /// Release the sink, returning how many records it accepted.
    fn close(self) -> Result<usize, StorageError>;
}

impl RecordSink for LedgerWriter {
    fn append(&mut self, record: &TripRecord) -> Result<(), StorageError> {
        LedgerWriter::append(self, record)
    }

    fn close(self) -> Result<usize, StorageError> {
        LedgerWriter::close(self)
    }
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    Ok(())
}
