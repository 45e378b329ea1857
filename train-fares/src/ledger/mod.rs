//! Persisted files shared by acquisition and matching.
//!
//! The record ledger is written by the acquisition run and read by the
//! matcher; the two never run against it at the same time. A missing
//! services report is written once when acquisition gives up.

mod error;
mod missing;
mod store;

pub use error::{RowError, StorageError};
pub use missing::{
    DEFAULT_MISSING_FILE, MISSING_HEADER, default_missing_path, write_missing_services,
};
pub use store::{LEDGER_HEADER, LedgerWriter, RecordLedger, RecordSink};
pub(crate) use store::{DELIMITER, create_parent_dirs};
