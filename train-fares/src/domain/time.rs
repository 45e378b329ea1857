//! Clock time and calendar date codecs.
//!
//! Providers and the ledger exchange times as "HH:MM" and dates as
//! "DD/MM/YYYY". This module converts between those strings and chrono
//! values.

use chrono::{NaiveDate, NaiveTime, Timelike};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Error returned when parsing an invalid date string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date {input:?}: expected DD/MM/YYYY")]
pub struct DateError {
    input: String,
}

/// Parse a local clock time from "HH:MM" (a single hour digit is accepted).
///
/// # Examples
///
/// ```
/// use train_fares::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
/// assert!(parse_hhmm("7:05").is_ok());
///
/// assert!(parse_hhmm("0705").is_err());
/// assert!(parse_hhmm("14:3").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let s = s.trim();
    let (hours, minutes) = s
        .split_once(':')
        .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    let hour = parse_digits(hours).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute = parse_digits(minutes).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Format a clock time as zero-padded "HH:MM".
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parse a calendar date from zero-padded "DD/MM/YYYY".
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use train_fares::domain::parse_date;
///
/// let date = parse_date("05/03/2024").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
///
/// assert!(parse_date("2024-03-05").is_err());
/// assert!(parse_date("31/02/2024").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    let trimmed = s.trim();
    let bytes = trimmed.as_bytes();
    let error = || DateError {
        input: s.to_string(),
    };

    if bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
        return Err(error());
    }

    let day = parse_digits(&trimmed[0..2]).ok_or_else(error)?;
    let month = parse_digits(&trimmed[3..5]).ok_or_else(error)?;
    let year = parse_digits(&trimmed[6..10]).ok_or_else(error)?;

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(error)
}

/// Format a calendar date as zero-padded "DD/MM/YYYY".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
