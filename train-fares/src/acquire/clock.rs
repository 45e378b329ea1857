//! Wall-clock source for search dates and observation times.

use chrono::NaiveDateTime;

/// Supplies the local date and time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
