//! Inclusive travel-date windows.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};

use super::time::{DateError, format_date, parse_date};

/// Errors from building a [`DateRange`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateRangeError {
    /// One of the bounds is not a valid date
    #[error(transparent)]
    Date(#[from] DateError),

    /// The range text is not "first-last"
    #[error("expected \"DD/MM/YYYY-DD/MM/YYYY\", got {0:?}")]
    Format(String),

    /// The first day is after the last
    #[error("first date {first} is after last date {last}")]
    Reversed { first: NaiveDate, last: NaiveDate },
}

/// A non-empty, inclusive range of calendar days.
///
/// # Examples
///
/// ```
/// use train_fares::domain::DateRange;
///
/// let range: DateRange = "30/04/2024-02/05/2024".parse().unwrap();
/// assert_eq!(range.len(), 3);
/// assert_eq!(range.to_string(), "30/04/2024-02/05/2024");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    first: NaiveDate,
    last: NaiveDate,
}

impl DateRange {
    /// Create a range from its first and last day (both included).
    pub fn new(first: NaiveDate, last: NaiveDate) -> Result<Self, DateRangeError> {
        if first > last {
            return Err(DateRangeError::Reversed { first, last });
        }
        Ok(Self { first, last })
    }

    /// A range covering a single day.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            first: day,
            last: day,
        }
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Number of days in the range.
    pub fn len(&self) -> usize {
        (self.last - self.first).num_days() as usize + 1
    }

    /// Always false: a range holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// All days in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.last;
        self.first.iter_days().take_while(move |d| *d <= last)
    }
}

/// Add a number of days to a date, or `None` past chrono's calendar limit.
pub fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

impl FromStr for DateRange {
    type Err = DateRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = s
            .split_once('-')
            .ok_or_else(|| DateRangeError::Format(s.to_string()))?;
        Self::new(parse_date(first)?, parse_date(last)?)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_date(self.first), format_date(self.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_are_inclusive() {
        let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 1)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1)
            ]
        );
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn single_day() {
        let range = DateRange::single(date(2024, 5, 1));
        assert_eq!(range.days().count(), 1);
        assert!(range.contains(date(2024, 5, 1)));
        assert!(!range.contains(date(2024, 5, 2)));
    }

    #[test]
    fn reversed_is_rejected() {
        let err = DateRange::new(date(2024, 5, 2), date(2024, 5, 1)).unwrap_err();
        assert_eq!(
            err,
            DateRangeError::Reversed {
                first: date(2024, 5, 2),
                last: date(2024, 5, 1)
            }
        );
    }

    #[test]
    fn contains_bounds() {
        let range = DateRange::new(date(2024, 5, 1), date(2024, 5, 31)).unwrap();
        assert!(range.contains(date(2024, 5, 1)));
        assert!(range.contains(date(2024, 5, 31)));
        assert!(!range.contains(date(2024, 4, 30)));
        assert!(!range.contains(date(2024, 6, 1)));
    }

    #[test]
    fn add_days_crosses_months_and_years() {
        assert_eq!(add_days(date(2024, 1, 31), 1), Some(date(2024, 2, 1)));
        assert_eq!(add_days(date(2024, 12, 30), 3), Some(date(2025, 1, 2)));
        assert_eq!(add_days(date(2024, 5, 1), 0), Some(date(2024, 5, 1)));
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn parse_from_str() {
        let range: DateRange = "01/05/2024-05/05/2024".parse().unwrap();
        assert_eq!(range.first(), date(2024, 5, 1));
        assert_eq!(range.last(), date(2024, 5, 5));

        assert!(matches!(
            "01/05/2024".parse::<DateRange>(),
            Err(DateRangeError::Format(_))
        ));
        assert!(matches!(
            "01/05/2024-xx".parse::<DateRange>(),
            Err(DateRangeError::Date(_))
        ));
        assert!(matches!(
            "05/05/2024-01/05/2024".parse::<DateRange>(),
            Err(DateRangeError::Reversed { .. })
        ));
    }
}
