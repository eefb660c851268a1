//! Recurrence rule types.
//!
//! A [`RecurrenceRule`] is a start date, a [`Frequency`] and an [`EndCondition`].
//! Each frequency variant carries exactly the fields it needs, so a weekly rule
//! cannot hold a monthly pattern and a monthly rule cannot lack one.
//!
//! JSON shape (serde):
//!
//! ```json
//! {
//!   "start": "2025-01-01",
//!   "frequency": { "kind": "weekly", "days": ["Mon", "Thu"] },
//!   "end": { "kind": "by_count", "count": 6 }
//! }
//! ```

use std::fmt;
use std::num::NonZeroU32;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A set of weekdays, stored as a bitmask (bit 0 = Monday).
///
/// Iteration always yields Monday-first order regardless of insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Insert a weekday. Returns `false` if it was already present.
    pub fn insert(&mut self, day: Weekday) -> bool {
        let bit = Self::bit(day);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_WEEKDAYS.into_iter().filter(|d| self.contains(*d))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

/// Ordinal position of a weekday inside a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::First,
        Position::Second,
        Position::Third,
        Position::Fourth,
        Position::Last,
    ];

    /// 1-based ordinal, or `None` for [`Position::Last`].
    pub fn ordinal(self) -> Option<u32> {
        match self {
            Position::First => Some(1),
            Position::Second => Some(2),
            Position::Third => Some(3),
            Position::Fourth => Some(4),
            Position::Last => None,
        }
    }
}

/// Which day of the target month a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthlyPattern {
    /// A fixed day number. Days past the end of a short month are clamped to
    /// that month's last day.
    DayOfMonth { day: u8 },
    /// The n-th (or last) given weekday of the month.
    WeekdayOfMonth { weekday: Weekday, position: Position },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// A custom step: `amount` units of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub amount: NonZeroU32,
    pub unit: IntervalUnit,
}

impl Interval {
    pub fn new(amount: NonZeroU32, unit: IntervalUnit) -> Self {
        Self { amount, unit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    /// An empty set means "the start's weekday, every 7 days".
    Weekly {
        #[serde(default)]
        days: WeekdaySet,
    },
    Monthly {
        pattern: MonthlyPattern,
    },
    Yearly,
    Custom {
        every: Interval,
    },
}

impl Frequency {
    /// Short lowercase name, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly { .. } => "weekly",
            Frequency::Monthly { .. } => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::Custom { .. } => "custom",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndCondition {
    /// Inclusive: an occurrence on `date` is kept.
    ByDate { date: NaiveDate },
    ByCount { count: NonZeroU32 },
}

/// A complete recurrence rule. Built transiently from form state, consumed by
/// [`crate::expander::generate`], then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub start: NaiveDate,
    pub frequency: Frequency,
    pub end: EndCondition,
}

impl RecurrenceRule {
    pub fn new(start: NaiveDate, frequency: Frequency, end: EndCondition) -> Self {
        Self {
            start,
            frequency,
            end,
        }
    }

    /// Same rule with a different start date.
    pub fn with_start(self, start: NaiveDate) -> Self {
        Self { start, ..self }
    }
}
