//! Ledger error types.

use std::path::{Path, PathBuf};

use crate::domain::{DateError, InvalidOperator, InvalidStation, TimeError};

/// Errors that stop reading or writing a persisted file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Opening, writing or syncing the file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited reader or writer failed
    #[error("delimited file error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A non-empty file without the ledger header is in the way
    #[error("{} exists but does not start with the ledger header", path.display())]
    NotALedger { path: PathBuf },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        StorageError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Why a single ledger row could not be turned into a record.
///
/// Row errors never fail a whole read; the row is skipped with a warning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RowError {
    #[error(transparent)]
    Station(#[from] InvalidStation),

    #[error(transparent)]
    Operator(#[from] InvalidOperator),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Time(#[from] TimeError),
}
