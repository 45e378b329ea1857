//! Choosing and ranking the cheapest round trips.

use super::combine::RoundTrip;

/// A round trip with its position in the cheapest-first ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTrip {
    /// Zero for the cheapest.
    pub rank: usize,
    pub trip: RoundTrip,
}

/// The cheapest `min_count` trips, plus every trip tied with the most
/// expensive of those.
///
/// Trips are ordered by total price; equal totals keep their input order.
/// With `min_count` of zero only the trips tied for cheapest are kept. With
/// fewer than `min_count` trips, all are kept.
pub fn select_cheapest(mut trips: Vec<RoundTrip>, min_count: usize) -> Vec<RoundTrip> {
    trips.sort_by_key(|trip| trip.total);

    let boundary = min_count.saturating_sub(1);
    let Some(limit) = trips.get(boundary).map(|trip| trip.total) else {
        return trips;
    };

    let keep = trips
        .iter()
        .skip(boundary + 1)
        .take_while(|trip| trip.total == limit)
        .count();
    trips.truncate(boundary + 1 + keep);
    trips
}

/// Number trips in order, starting at zero.
pub fn rank(trips: Vec<RoundTrip>) -> Vec<RankedTrip> {
    trips
        .into_iter()
        .enumerate()
        .map(|(rank, trip)| RankedTrip { rank, trip })
        .collect()
}
