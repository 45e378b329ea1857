//! Fare acquisition.
//!
//! An acquisition run plans one [`RequestTask`](crate::domain::RequestTask)
//! per route and travel date, asks a [`ServiceProvider`] for each, and
//! appends every offer it gets back to the ledger. Failed tasks stay pending
//! and are retried; after too many failures in a row the run gives up and
//! reports what is still missing.

mod clock;
mod config;
mod error;
mod orchestrator;
mod plan;
mod progress;
mod provider;
mod replay;
mod stop;

pub use clock::{Clock, SystemClock};
pub use config::{AcquireConfig, DEFAULT_FAILURE_THRESHOLD, Selection};
pub use error::{AcquireError, ValidationError};
pub use orchestrator::{Orchestrator, RunPhase, RunReport};
pub use plan::{check_start_date, cross_product, plan_tasks};
pub use progress::{Progress, display_minutes, estimate_remaining};
pub use provider::{FailureKind, FetchOutcome, ServiceProvider};
pub use replay::ReplayProvider;
pub use stop::StopSignal;
