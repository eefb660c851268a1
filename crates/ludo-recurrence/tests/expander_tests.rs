//! Tests for series expansion.

use std::num::NonZeroU32;

use chrono::{NaiveDate, Weekday};
use ludo_recurrence::{
    generate, generate_with_options, EndCondition, Frequency, GenerateOptions, Interval,
    IntervalUnit, MonthlyPattern, Position, RecurrenceRule, WeekdaySet, DEFAULT_SAFETY_CAP,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn count(n: u32) -> EndCondition {
    EndCondition::ByCount {
        count: NonZeroU32::new(n).unwrap(),
    }
}

fn until(date: NaiveDate) -> EndCondition {
    EndCondition::ByDate { date }
}

fn weekly(days: &[Weekday]) -> Frequency {
    Frequency::Weekly {
        days: days.iter().copied().collect(),
    }
}

fn day_of_month(day: u8) -> Frequency {
    Frequency::Monthly {
        pattern: MonthlyPattern::DayOfMonth { day },
    }
}

fn weekday_of_month(weekday: Weekday, position: Position) -> Frequency {
    Frequency::Monthly {
        pattern: MonthlyPattern::WeekdayOfMonth { weekday, position },
    }
}

fn custom(amount: u32, unit: IntervalUnit) -> Frequency {
    Frequency::Custom {
        every: Interval::new(NonZeroU32::new(amount).unwrap(), unit),
    }
}

// ---------------------------------------------------------------------------
// Daily
// ---------------------------------------------------------------------------

#[test]
fn daily_count_five() {
    let rule = RecurrenceRule::new(d(2025, 3, 1), Frequency::Daily, count(5));
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![
            d(2025, 3, 1),
            d(2025, 3, 2),
            d(2025, 3, 3),
            d(2025, 3, 4),
            d(2025, 3, 5)
        ]
    );
    assert!(!series.truncated);
    assert!(!series.clamped);
}

#[test]
fn daily_end_date_is_inclusive() {
    let rule = RecurrenceRule::new(d(2025, 2, 26), Frequency::Daily, until(d(2025, 3, 2)));
    let series = generate(&rule);

    assert_eq!(series.len(), 5);
    assert_eq!(series.first(), Some(d(2025, 2, 26)));
    assert_eq!(series.last(), Some(d(2025, 3, 2)), "end date itself is kept");
}

#[test]
fn end_date_before_start_yields_nothing() {
    let rule = RecurrenceRule::new(d(2025, 6, 1), Frequency::Daily, until(d(2020, 1, 1)));
    let series = generate(&rule);

    assert!(series.is_empty());
    assert!(!series.truncated);
}

#[test]
fn end_date_equal_to_start_yields_start_only() {
    let rule = RecurrenceRule::new(d(2025, 6, 1), Frequency::Yearly, until(d(2025, 6, 1)));
    assert_eq!(generate(&rule).dates, vec![d(2025, 6, 1)]);
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

#[test]
fn weekly_monday_thursday_from_wednesday() {
    // 2025-01-01 is a Wednesday: not selected, so it is not emitted.
    let rule = RecurrenceRule::new(
        d(2025, 1, 1),
        weekly(&[Weekday::Mon, Weekday::Thu]),
        count(4),
    );
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2025, 1, 2), d(2025, 1, 6), d(2025, 1, 9), d(2025, 1, 13)]
    );
}

#[test]
fn weekly_start_on_selected_day_is_first_occurrence() {
    let rule = RecurrenceRule::new(
        d(2025, 1, 1),
        weekly(&[Weekday::Fri, Weekday::Wed]),
        count(4),
    );
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2025, 1, 1), d(2025, 1, 3), d(2025, 1, 8), d(2025, 1, 10)]
    );
}

#[test]
fn weekly_without_days_repeats_start_weekday() {
    let rule = RecurrenceRule::new(d(2025, 1, 1), weekly(&[]), count(3));
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2025, 1, 1), d(2025, 1, 8), d(2025, 1, 15)]
    );
}

#[test]
fn weekly_every_day_matches_daily() {
    let all = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    let weekly_rule = RecurrenceRule::new(d(2025, 5, 5), weekly(&all), count(20));
    let daily_rule = RecurrenceRule::new(d(2025, 5, 5), Frequency::Daily, count(20));

    assert_eq!(generate(&weekly_rule).dates, generate(&daily_rule).dates);
}

#[test]
fn weekly_until_date_on_selected_day() {
    // Thu 2025-01-02 .. Thu 2025-01-16, Mondays and Thursdays.
    let rule = RecurrenceRule::new(
        d(2025, 1, 2),
        weekly(&[Weekday::Mon, Weekday::Thu]),
        until(d(2025, 1, 16)),
    );
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![
            d(2025, 1, 2),
            d(2025, 1, 6),
            d(2025, 1, 9),
            d(2025, 1, 13),
            d(2025, 1, 16)
        ]
    );
}

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

#[test]
fn monthly_day_31_clamps_in_short_months() {
    let rule = RecurrenceRule::new(d(2025, 1, 31), day_of_month(31), count(3));
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2025, 1, 31), d(2025, 2, 28), d(2025, 3, 31)]
    );
    assert!(series.clamped);
}

#[test]
fn monthly_day_31_clamps_to_leap_day() {
    let rule = RecurrenceRule::new(d(2024, 1, 31), day_of_month(31), count(4));
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]
    );
}

#[test]
fn monthly_day_31_start_in_short_month_is_flagged() {
    // April has 30 days, so the start only matches day 31 after clamping.
    let rule = RecurrenceRule::new(d(2025, 4, 30), day_of_month(31), count(1));
    let series = generate(&rule);

    assert_eq!(series.dates, vec![d(2025, 4, 30)]);
    assert!(series.clamped);
}

#[test]
fn monthly_day_15_start_on_match_is_not_flagged() {
    let rule = RecurrenceRule::new(d(2025, 4, 15), day_of_month(15), count(2));
    let series = generate(&rule);

    assert_eq!(series.dates, vec![d(2025, 4, 15), d(2025, 5, 15)]);
    assert!(!series.clamped);
}

#[test]
fn monthly_day_pattern_skips_rest_of_start_month() {
    // Documented behavior: a start that does not match the pattern is not
    // emitted, and the 15th of the start month is never considered.
    let rule = RecurrenceRule::new(d(2025, 1, 10), day_of_month(15), count(3));
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2025, 2, 15), d(2025, 3, 15), d(2025, 4, 15)]
    );
}

#[test]
fn monthly_end_date_on_occurrence_is_kept() {
    let rule = RecurrenceRule::new(d(2025, 1, 15), day_of_month(15), until(d(2025, 3, 15)));
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 1, 15), d(2025, 2, 15), d(2025, 3, 15)]
    );
}

#[test]
fn monthly_day_zero_is_clamped_to_first() {
    let rule = RecurrenceRule::new(d(2025, 1, 1), day_of_month(0), count(2));
    assert_eq!(generate(&rule).dates, vec![d(2025, 1, 1), d(2025, 2, 1)]);
}

#[test]
fn first_friday_from_january_starts_in_february() {
    // 2025-01-10 is the second Friday of January, so only later months count.
    let rule = RecurrenceRule::new(
        d(2025, 1, 10),
        weekday_of_month(Weekday::Fri, Position::First),
        count(3),
    );
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2025, 2, 7), d(2025, 3, 7), d(2025, 4, 4)]
    );
}

#[test]
fn first_friday_start_on_match_is_kept() {
    let rule = RecurrenceRule::new(
        d(2025, 1, 3),
        weekday_of_month(Weekday::Fri, Position::First),
        count(3),
    );
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 1, 3), d(2025, 2, 7), d(2025, 3, 7)]
    );
}

#[test]
fn last_sunday_of_month() {
    let rule = RecurrenceRule::new(
        d(2025, 3, 1),
        weekday_of_month(Weekday::Sun, Position::Last),
        count(3),
    );
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 4, 27), d(2025, 5, 25), d(2025, 6, 29)]
    );
}

#[test]
fn third_tuesday_of_month() {
    // 2026-02-17 is the third Tuesday of February 2026.
    let rule = RecurrenceRule::new(
        d(2026, 2, 17),
        weekday_of_month(Weekday::Tue, Position::Third),
        count(3),
    );
    assert_eq!(
        generate(&rule).dates,
        vec![d(2026, 2, 17), d(2026, 3, 17), d(2026, 4, 21)]
    );
}

// ---------------------------------------------------------------------------
// Yearly
// ---------------------------------------------------------------------------

#[test]
fn yearly_same_day_each_year() {
    let rule = RecurrenceRule::new(d(2025, 6, 15), Frequency::Yearly, count(3));
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 6, 15), d(2026, 6, 15), d(2027, 6, 15)]
    );
}

#[test]
fn yearly_leap_day_clamps_and_returns() {
    let rule = RecurrenceRule::new(d(2024, 2, 29), Frequency::Yearly, count(5));
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![
            d(2024, 2, 29),
            d(2025, 2, 28),
            d(2026, 2, 28),
            d(2027, 2, 28),
            d(2028, 2, 29)
        ]
    );
    assert!(series.clamped);
}

// ---------------------------------------------------------------------------
// Custom
// ---------------------------------------------------------------------------

#[test]
fn custom_every_three_weeks() {
    let rule = RecurrenceRule::new(d(2025, 1, 1), custom(3, IntervalUnit::Weeks), count(4));
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 1, 1), d(2025, 1, 22), d(2025, 2, 12), d(2025, 3, 5)]
    );
}

#[test]
fn custom_days_cross_year_boundary() {
    let rule = RecurrenceRule::new(d(2025, 12, 25), custom(10, IntervalUnit::Days), count(3));
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 12, 25), d(2026, 1, 4), d(2026, 1, 14)]
    );
}

#[test]
fn custom_months_stay_anchored_to_start_day() {
    let rule = RecurrenceRule::new(d(2025, 1, 31), custom(1, IntervalUnit::Months), count(4));
    let series = generate(&rule);

    assert_eq!(
        series.dates,
        vec![d(2025, 1, 31), d(2025, 2, 28), d(2025, 3, 31), d(2025, 4, 30)]
    );
    assert!(series.clamped);
}

#[test]
fn custom_two_months_over_year_end() {
    let rule = RecurrenceRule::new(d(2025, 11, 8), custom(2, IntervalUnit::Months), count(3));
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 11, 8), d(2026, 1, 8), d(2026, 3, 8)]
    );
}

#[test]
fn custom_two_years() {
    let rule = RecurrenceRule::new(d(2025, 9, 1), custom(2, IntervalUnit::Years), count(3));
    assert_eq!(
        generate(&rule).dates,
        vec![d(2025, 9, 1), d(2027, 9, 1), d(2029, 9, 1)]
    );
}

// ---------------------------------------------------------------------------
// Safety cap and idempotence
// ---------------------------------------------------------------------------

#[test_log::test]
fn safety_cap_truncates_long_daily_series() {
    let rule = RecurrenceRule::new(d(2025, 1, 1), Frequency::Daily, until(d(2040, 1, 1)));
    let series = generate(&rule);

    assert_eq!(series.len(), DEFAULT_SAFETY_CAP);
    assert!(series.truncated);
}

#[test_log::test]
fn custom_safety_cap_is_honored() {
    let rule = RecurrenceRule::new(d(2025, 1, 1), Frequency::Daily, count(50));
    let series = generate_with_options(&rule, &GenerateOptions { safety_cap: 10 });

    assert_eq!(series.len(), 10);
    assert!(series.truncated);
}

#[test]
fn count_equal_to_cap_is_not_truncated() {
    let rule = RecurrenceRule::new(d(2025, 1, 1), Frequency::Daily, count(10));
    let series = generate_with_options(&rule, &GenerateOptions { safety_cap: 10 });

    assert_eq!(series.len(), 10);
    assert!(!series.truncated);
}

#[test]
fn generation_is_idempotent() {
    let rule = RecurrenceRule::new(
        d(2025, 4, 2),
        weekday_of_month(Weekday::Sat, Position::Second),
        until(d(2026, 4, 2)),
    );
    assert_eq!(generate(&rule), generate(&rule));
}

#[test]
fn weekday_set_iterates_monday_first() {
    let set: WeekdaySet = [Weekday::Sun, Weekday::Wed, Weekday::Mon].into_iter().collect();
    let days: Vec<Weekday> = set.iter().collect();
    assert_eq!(days, vec![Weekday::Mon, Weekday::Wed, Weekday::Sun]);
    assert_eq!(set.len(), 3);
}
