//! Source of "today" for the planner.
//!
//! The expander never reads the current time; only caller-side policy (start
//! dates may not lie in the past, forms default to today) does, and it goes
//! through an injected [`Clock`] so it stays testable.

use chrono::{Local, NaiveDate};

pub trait Clock {
    /// The current local calendar date.
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Reads the host's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
