//! Pairing outbound trains with returns.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::domain::{DateRange, Price, add_days};

use super::load::{OptionKey, TrainOption};

/// An outbound train with a return train, and what the two cost together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    pub outbound: TrainOption,
    pub inbound: TrainOption,
    pub total: Price,
}

impl RoundTrip {
    pub fn new(outbound: TrainOption, inbound: TrainOption) -> Self {
        let total = outbound.price + inbound.price;
        Self {
            outbound,
            inbound,
            total,
        }
    }

    /// Days between the two travel dates.
    pub fn length(&self) -> i64 {
        (self.inbound.travel_date - self.outbound.travel_date).num_days()
    }
}

/// Every legal pairing of an outbound and a return train.
///
/// For each outbound date in `window` and each trip length, the return date
/// must also fall in `window`. Pairs of the same two trains collapse to one
/// entry, which keeps the position of its first occurrence and the data of
/// its last.
pub fn enumerate_combinations(
    outbound: &BTreeMap<NaiveDate, Vec<TrainOption>>,
    inbound: &BTreeMap<NaiveDate, Vec<TrainOption>>,
    window: &DateRange,
    trip_lengths: &[u32],
) -> Vec<RoundTrip> {
    let mut trips: Vec<RoundTrip> = Vec::new();
    let mut index: HashMap<(OptionKey, OptionKey), usize> = HashMap::new();

    for day in window.days() {
        let Some(going) = outbound.get(&day) else {
            continue;
        };

        for &length in trip_lengths {
            let Some(back) = add_days(day, length) else {
                continue;
            };
            if !window.contains(back) {
                continue;
            }
            let Some(returning) = inbound.get(&back) else {
                continue;
            };

            for out in going {
                for ret in returning {
                    let trip = RoundTrip::new(out.clone(), ret.clone());
                    match index.entry((out.key(), ret.key())) {
                        Entry::Occupied(at) => trips[*at.get()] = trip,
                        Entry::Vacant(slot) => {
                            slot.insert(trips.len());
                            trips.push(trip);
                        }
                    }
                }
            }
        }
    }

    trips
}
