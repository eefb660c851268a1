//! Series expansion: turns a [`RecurrenceRule`] into the ordered list of calendar
//! dates on which the event takes place.
//!
//! Expansion is pure and deterministic. It never reads the current time and
//! always terminates: besides the rule's own end condition, a safety cap bounds
//! the number of emitted dates so a contradictory rule cannot hang the caller.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::rule::{EndCondition, Frequency, IntervalUnit, MonthlyPattern, RecurrenceRule};

/// Five years' worth of daily dates.
pub const DEFAULT_SAFETY_CAP: usize = 1825;

/// Tuning knobs for [`generate_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Maximum number of dates emitted before expansion stops with
    /// `truncated = true`.
    pub safety_cap: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            safety_cap: DEFAULT_SAFETY_CAP,
        }
    }
}

/// The result of expanding a rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Series {
    /// Strictly increasing, duplicate-free.
    pub dates: Vec<NaiveDate>,
    /// The safety cap stopped expansion before the end condition did.
    pub truncated: bool,
    /// At least one date had its day clamped to the end of a short month
    /// (day 31 in April, Feb 29 in a common year, ...).
    pub clamped: bool,
}

impl Series {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }
}

/// Expand `rule` with the default safety cap.
pub fn generate(rule: &RecurrenceRule) -> Series {
    generate_with_options(rule, &GenerateOptions::default())
}

/// Expand `rule` into its series of dates.
///
/// The start date is always the first candidate. Daily, yearly and custom
/// rules emit it unconditionally; weekly and monthly rules emit it only if it
/// matches their pattern. Monthly rules never look at other days of the start
/// month: the next candidate is always taken from the following month.
///
/// `EndCondition::ByDate` is inclusive. `EndCondition::ByCount` yields exactly
/// `count` dates unless the safety cap is reached first, in which case the
/// partial series is returned with `truncated` set.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(frequency = %rule.frequency, start = %rule.start)
)]
pub fn generate_with_options(rule: &RecurrenceRule, options: &GenerateOptions) -> Series {
    let mut stepper = Stepper::new(rule);
    let mut series = Series::default();
    let mut current = rule.start;
    let mut first = true;

    loop {
        match rule.end {
            EndCondition::ByDate { date } if current > date => break,
            EndCondition::ByCount { count } if series.dates.len() >= count.get() as usize => break,
            _ => {}
        }

        if series.dates.len() >= options.safety_cap {
            series.truncated = true;
            tracing::warn!(
                cap = options.safety_cap,
                next = %current,
                "Safety cap reached, returning truncated series"
            );
            break;
        }

        let eligible = !first || stepper.matches_start();
        if eligible && series.dates.last() != Some(&current) {
            if first {
                stepper.note_start_clamp();
            }
            series.dates.push(current);
        }

        let Some(next) = stepper.advance(current, first) else {
            tracing::warn!(last = %current, "Calendar range exhausted");
            break;
        };
        if next < current || (next == current && !first) {
            tracing::warn!(current = %current, next = %next, "Recurrence stalled");
            break;
        }
        current = next;
        first = false;
    }

    series.clamped = stepper.clamped;
    tracing::debug!(
        emitted = series.dates.len(),
        truncated = series.truncated,
        clamped = series.clamped,
        "Series generated"
    );
    series
}

/// Per-call advance state: the rule plus anything derived from it once.
struct Stepper<'a> {
    rule: &'a RecurrenceRule,
    /// Requested day of month for `DayOfMonth`, normalized into 1..=31.
    month_day: u32,
    clamped: bool,
}

impl<'a> Stepper<'a> {
    fn new(rule: &'a RecurrenceRule) -> Self {
        let month_day = match rule.frequency {
            Frequency::Monthly {
                pattern: MonthlyPattern::DayOfMonth { day },
            } => {
                let normalized = u32::from(day).clamp(1, 31);
                if normalized != u32::from(day) {
                    tracing::warn!(day, normalized, "Day of month out of range, clamped");
                }
                normalized
            }
            _ => rule.start.day(),
        };

        Self {
            rule,
            month_day,
            clamped: false,
        }
    }

    /// Whether the start date itself satisfies the rule's pattern.
    fn matches_start(&self) -> bool {
        let start = self.rule.start;
        match self.rule.frequency {
            Frequency::Weekly { days } => days.is_empty() || days.contains(start.weekday()),
            Frequency::Monthly {
                pattern: MonthlyPattern::DayOfMonth { .. },
            } => calendar::clamp_day(start.year(), start.month(), self.month_day) == Some(start),
            Frequency::Monthly {
                pattern: MonthlyPattern::WeekdayOfMonth { weekday, position },
            } => {
                calendar::nth_weekday_of_month(start.year(), start.month(), weekday, position)
                    == Some(start)
            }
            Frequency::Daily | Frequency::Yearly | Frequency::Custom { .. } => true,
        }
    }

    /// Next candidate after `current`. On the first iteration a weekly rule may
    /// return `current` itself when it already falls on a selected weekday.
    fn advance(&mut self, current: NaiveDate, first: bool) -> Option<NaiveDate> {
        let start = self.rule.start;
        match self.rule.frequency {
            Frequency::Daily => current.checked_add_days(Days::new(1)),
            Frequency::Weekly { days } => {
                if days.is_empty() {
                    return current.checked_add_days(Days::new(7));
                }
                let from = if first {
                    current
                } else {
                    current.checked_add_days(Days::new(1))?
                };
                calendar::next_matching_weekday(from, &days)
                    .or_else(|| current.checked_add_days(Days::new(7)))
            }
            Frequency::Monthly { pattern } => {
                let target = calendar::first_of_next_month(current)?;
                match pattern {
                    MonthlyPattern::DayOfMonth { .. } => {
                        self.clamp_into(target.year(), target.month(), self.month_day)
                    }
                    MonthlyPattern::WeekdayOfMonth { weekday, position } => {
                        calendar::nth_weekday_of_month(
                            target.year(),
                            target.month(),
                            weekday,
                            position,
                        )
                    }
                }
            }
            Frequency::Yearly => {
                let next = calendar::add_years_clamped(current, 1, start.month(), start.day())?;
                self.note_clamp(next, start.day());
                Some(next)
            }
            Frequency::Custom { every } => {
                let amount = every.amount.get();
                match every.unit {
                    IntervalUnit::Days => current.checked_add_days(Days::new(u64::from(amount))),
                    IntervalUnit::Weeks => {
                        current.checked_add_days(Days::new(u64::from(amount) * 7))
                    }
                    IntervalUnit::Months => {
                        let next = calendar::add_months_clamped(current, amount, start.day())?;
                        self.note_clamp(next, start.day());
                        Some(next)
                    }
                    IntervalUnit::Years => {
                        let next = calendar::add_years_clamped(
                            current,
                            amount,
                            start.month(),
                            start.day(),
                        )?;
                        self.note_clamp(next, start.day());
                        Some(next)
                    }
                }
            }
        }
    }

    /// A `DayOfMonth` start in a month shorter than the requested day only
    /// matches because it was clamped.
    fn note_start_clamp(&mut self) {
        if let Frequency::Monthly {
            pattern: MonthlyPattern::DayOfMonth { .. },
        } = self.rule.frequency
        {
            self.note_clamp(self.rule.start, self.month_day);
        }
    }

    fn clamp_into(&mut self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        let date = calendar::clamp_day(year, month, day)?;
        self.note_clamp(date, day);
        Some(date)
    }

    fn note_clamp(&mut self, date: NaiveDate, requested_day: u32) {
        if date.day() < requested_day {
            tracing::debug!(date = %date, requested_day, "Day clamped to end of month");
            self.clamped = true;
        }
    }
}
