//! Loading one direction's trains from the ledger.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::domain::{DateRange, Operator, Price, StationId, TripRecord};
use crate::ledger::{RecordLedger, StorageError};

/// A purchasable train, as the matcher sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainOption {
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub price: Price,
    pub operator: Operator,
    pub travel_date: NaiveDate,
    /// Day the offer was seen; not part of its identity.
    pub search_date: NaiveDate,
}

/// Identity of a train option: the same train at the same price, whenever
/// it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionKey {
    departure: NaiveTime,
    arrival: NaiveTime,
    price: Price,
    operator: Operator,
    travel_date: NaiveDate,
}

impl TrainOption {
    /// `None` if the record has no numeric price.
    pub fn from_record(record: TripRecord) -> Option<Self> {
        Some(Self {
            departure: record.departure,
            arrival: record.arrival,
            price: record.fare.amount()?,
            operator: record.operator,
            travel_date: record.travel_date,
            search_date: record.search_date,
        })
    }

    pub fn key(&self) -> OptionKey {
        OptionKey {
            departure: self.departure,
            arrival: self.arrival,
            price: self.price,
            operator: self.operator.clone(),
            travel_date: self.travel_date,
        }
    }
}

/// Trains from `origin` to `destination` on dates in `window`, grouped by
/// travel date in ledger order.
pub fn load_trains(
    ledger: &RecordLedger,
    origin: &StationId,
    destination: &StationId,
    window: &DateRange,
) -> Result<BTreeMap<NaiveDate, Vec<TrainOption>>, StorageError> {
    let dates: HashSet<NaiveDate> = window.days().collect();
    let records = ledger.load_filtered(origin, destination, &dates)?;

    let trains: BTreeMap<_, Vec<_>> = records
        .into_iter()
        .map(|(date, records)| {
            let options = records
                .into_iter()
                .filter_map(TrainOption::from_record)
                .collect();
            (date, options)
        })
        .collect();

    debug!(
        %origin,
        %destination,
        dates = trains.len(),
        trains = trains.values().map(Vec::len).sum::<usize>(),
        "loaded trains"
    );
    Ok(trains)
}
