//! Domain types for fare acquisition and round-trip matching.
//!
//! This module contains the validated values that flow between providers,
//! the ledger and the matcher. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod dates;
mod fare;
mod operator;
mod record;
mod station;
mod time;

pub use dates::{DateRange, DateRangeError, add_days};
pub use fare::{Fare, Price};
pub use operator::{InvalidOperator, Operator};
pub use record::{DedupKey, MissingService, Offer, RequestTask, Route, TripRecord};
pub use station::{InvalidStation, StationId};
pub use time::{DateError, TimeError, format_date, format_hhmm, parse_date, parse_hhmm};
