//! Acquisition error types.

use chrono::NaiveDate;

use crate::ledger::StorageError;

/// Inputs rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The first travel date is earlier than the search date
    #[error("travel dates start on {start}, before today ({today})")]
    StartBeforeToday { start: NaiveDate, today: NaiveDate },
}

/// Errors that end an acquisition run.
///
/// Provider failures are not here: they are counted, not propagated.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
