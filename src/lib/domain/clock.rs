//! Wall-clock access

use std::fmt;

use chrono::{Local, NaiveDate};

/// A source of the current calendar date
pub trait Clock: fmt::Debug + Send + Sync + 'static {
    /// Today's date in the server's local time zone
    fn today(&self) -> NaiveDate;
}

/// The system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one day
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
