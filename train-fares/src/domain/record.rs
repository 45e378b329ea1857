//! Trip records and the units of acquisition work built around them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{Fare, Operator, StationId};

/// An ordered (origin, destination) pair to acquire services for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub origin: StationId,
    pub destination: StationId,
}

impl Route {
    pub fn new(origin: StationId, destination: StationId) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// The same pair travelled the other way.
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
        }
    }
}

/// Identifies "this route and travel date was already searched on this day".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub origin: StationId,
    pub destination: StationId,
    pub travel_date: NaiveDate,
    pub search_date: NaiveDate,
}

/// One observed service instance, as persisted in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TripRecord {
    pub origin: StationId,
    pub destination: StationId,
    pub travel_date: NaiveDate,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub fare: Fare,
    pub operator: Operator,
    pub search_date: NaiveDate,
    /// Observation time, minute precision.
    pub search_time: NaiveTime,
}

impl TripRecord {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            travel_date: self.travel_date,
            search_date: self.search_date,
        }
    }
}

/// A pending acquisition: one route on one travel date, searched today.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTask {
    pub origin: StationId,
    pub destination: StationId,
    pub travel_date: NaiveDate,
    pub search_date: NaiveDate,
}

impl RequestTask {
    pub fn new(route: &Route, travel_date: NaiveDate, search_date: NaiveDate) -> Self {
        Self {
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            travel_date,
            search_date,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            travel_date: self.travel_date,
            search_date: self.search_date,
        }
    }

    /// The entry to report if this task is still pending when acquisition gives up.
    pub fn to_missing(&self) -> MissingService {
        MissingService {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            travel_date: self.travel_date,
        }
    }
}

/// A route and date for which no offers could be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingService {
    pub origin: StationId,
    pub destination: StationId,
    pub travel_date: NaiveDate,
}

/// One service as returned by a provider, before it is stamped and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub fare: Fare,
    pub operator: Operator,
}

impl Offer {
    /// Build the ledger record for this offer, observed at `observed_at`.
    pub fn into_record(self, task: &RequestTask, observed_at: NaiveDateTime) -> TripRecord {
        let seen = observed_at.time();
        TripRecord {
            origin: task.origin.clone(),
            destination: task.destination.clone(),
            travel_date: task.travel_date,
            departure: self.departure,
            arrival: self.arrival,
            fare: self.fare,
            operator: self.operator,
            search_date: observed_at.date(),
            search_time: NaiveTime::from_hms_opt(seen.hour(), seen.minute(), 0).unwrap_or(seen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn task_and_record_share_dedup_key() {
        let route = Route::new(station("Madrid"), station("Barcelona"));
        let task = RequestTask::new(&route, date(2024, 5, 1), date(2024, 4, 20));

        let offer = Offer {
            departure: hm(6, 30),
            arrival: hm(9, 15),
            fare: Fare::parse("7,00"),
            operator: Operator::parse("AVLO").unwrap(),
        };
        let observed = date(2024, 4, 20).and_hms_opt(10, 42, 17).unwrap();
        let record = offer.into_record(&task, observed);

        assert_eq!(record.dedup_key(), task.dedup_key());
        assert_eq!(record.search_time, hm(10, 42));
        assert_eq!(record.origin, station("Madrid"));
        assert_eq!(record.travel_date, date(2024, 5, 1));
    }

    #[test]
    fn record_takes_observation_date() {
        // A run that crosses midnight stamps records with the day they were seen
        let route = Route::new(station("Madrid"), station("Valencia"));
        let task = RequestTask::new(&route, date(2024, 5, 1), date(2024, 4, 20));
        let offer = Offer {
            departure: hm(6, 30),
            arrival: hm(8, 15),
            fare: Fare::parse("15"),
            operator: Operator::parse("OUIGO").unwrap(),
        };
        let observed = date(2024, 4, 21).and_hms_opt(0, 5, 0).unwrap();
        let record = offer.into_record(&task, observed);
        assert_eq!(record.search_date, date(2024, 4, 21));
    }

    #[test]
    fn reversed_route() {
        let route = Route::new(station("Madrid"), station("Sevilla"));
        let back = route.reversed();
        assert_eq!(back.origin, station("Sevilla"));
        assert_eq!(back.destination, station("Madrid"));
        assert_eq!(back.reversed(), route);
    }

    #[test]
    fn missing_drops_search_date() {
        let route = Route::new(station("Madrid"), station("Sevilla"));
        let task = RequestTask::new(&route, date(2024, 5, 3), date(2024, 4, 20));
        let missing = task.to_missing();
        assert_eq!(missing.origin, route.origin);
        assert_eq!(missing.travel_date, date(2024, 5, 3));
    }
}
