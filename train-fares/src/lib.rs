//! Train fare acquisition and round-trip search.
//!
//! Two batch jobs share a pipe-delimited ledger of observed fares:
//! acquisition asks a provider for every route and date and appends what
//! it finds, and the matcher reads the ledger back to find the cheapest
//! outbound and return pairs.

pub mod acquire;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod matcher;

