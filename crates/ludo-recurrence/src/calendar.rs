//! Plain calendar arithmetic on `NaiveDate`.
//!
//! Everything here works on local calendar dates with no time-of-day and no
//! timezone, so no result can shift by a day near midnight. Month arithmetic
//! always goes through day 1 of the target month and then clamps the day, so
//! "Jan 31 + 1 month" is Feb 28/29 and never rolls into March.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::rule::{Position, WeekdaySet};

/// How far forward a weekday scan may look before giving up.
const WEEKDAY_SCAN_DAYS: u64 = 14;

/// Number of days in the given month (1-based).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// The date `day` of the given month, clamped into `1..=days_in_month`.
pub fn clamp_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Day 1 of the month after `date`.
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    add_months_clamped(date, 1, 1)
}

/// Move `months` months forward from `date` and land on `day` of the target
/// month, clamped to the month's length.
pub fn add_months_clamped(date: NaiveDate, months: u32, day: u32) -> Option<NaiveDate> {
    let index = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    clamp_day(year, month, day)
}

/// Move `years` years forward from `date`, keeping `month`/`day` of the
/// anchor. Feb 29 becomes Feb 28 in non-leap years.
pub fn add_years_clamped(date: NaiveDate, years: u32, month: u32, day: u32) -> Option<NaiveDate> {
    let year = date.year().checked_add(i32::try_from(years).ok()?)?;
    clamp_day(year, month, day)
}

/// The `position`-th `weekday` of the given month, found by scanning every day
/// of the month. `Position::Last` picks the final match.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    position: Position,
) -> Option<NaiveDate> {
    let mut matches = (1..=days_in_month(year, month))
        .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .filter(|d| d.weekday() == weekday);

    match position.ordinal() {
        Some(n) => matches.nth(n as usize - 1),
        None => matches.last(),
    }
}

/// First date at or after `from` whose weekday is in `days`, looking at most
/// two weeks ahead.
pub fn next_matching_weekday(from: NaiveDate, days: &WeekdaySet) -> Option<NaiveDate> {
    (0..WEEKDAY_SCAN_DAYS)
        .filter_map(|offset| from.checked_add_days(Days::new(offset)))
        .find(|d| days.contains(d.weekday()))
}

/// Move `start` forward to the nearest date (itself included) falling on one
/// of the selected weekdays, wrapping at most one week.
///
/// This is the form layer's convenience step before generating a weekly
/// series: a user who picks "Mondays and Thursdays" but a Wednesday start gets
/// a series starting on the Thursday. An empty set leaves `start` unchanged.
pub fn align_to_weekdays(start: NaiveDate, days: &WeekdaySet) -> NaiveDate {
    if days.is_empty() {
        return start;
    }
    (0..7)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .find(|d| days.contains(d.weekday()))
        .unwrap_or(start)
}
