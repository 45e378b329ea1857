//! Matcher error types.

use crate::ledger::StorageError;

/// Errors that end a matcher run.
///
/// Ledger rows that cannot be used are skipped, not reported here.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("ledger not found at {0}")]
    LedgerMissing(std::path::PathBuf),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
