//! The capability acquisition runs against.

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{Offer, Operator, StationId};

/// Why a fetch produced nothing usable.
///
/// The orchestrator treats every kind the same way; the distinction only
/// shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
    /// The page rendered but listed no services. Sold out and a silently
    /// broken page look the same from here.
    #[error("no offers found")]
    NoOffers,

    /// Timeout, unexpected page layout, lost session or similar.
    #[error("provider fault: {0}")]
    ProviderFault(String),
}

/// Result of one provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Offers(Vec<Offer>),
    Failure(FailureKind),
}

impl FetchOutcome {
    pub fn fault(message: impl Into<String>) -> Self {
        FetchOutcome::Failure(FailureKind::ProviderFault(message.into()))
    }

    /// The offers, if there is at least one. An empty list counts as
    /// [`FailureKind::NoOffers`].
    pub fn into_offers(self) -> Result<Vec<Offer>, FailureKind> {
        match self {
            FetchOutcome::Offers(offers) if !offers.is_empty() => Ok(offers),
            FetchOutcome::Offers(_) => Err(FailureKind::NoOffers),
            FetchOutcome::Failure(kind) => Err(kind),
        }
    }
}

/// Source of offers for one route on one date.
///
/// Implementations must return within bounded time, turning any hang into
/// [`FailureKind::ProviderFault`], and must not retry internally: retry
/// policy belongs to the orchestrator.
pub trait ServiceProvider {
    /// Operator named in the missing-services report.
    fn operator(&self) -> &Operator;

    /// Fetch all offers from `origin` to `destination` on `travel_date`.
    fn fetch(
        &self,
        origin: &StationId,
        destination: &StationId,
        travel_date: NaiveDate,
    ) -> impl Future<Output = FetchOutcome>;
}
