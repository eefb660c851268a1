//! The single locale table: weekday, position and month names, long-form date
//! formatting and rule descriptions.
//!
//! Rule types only carry `chrono::Weekday` and [`Position`]; localized names
//! exist only here, at the boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::rule::{EndCondition, Frequency, IntervalUnit, MonthlyPattern, Position, RecurrenceRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::De, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }

    pub fn weekday_name(self, day: Weekday) -> &'static str {
        let idx = day.num_days_from_monday() as usize;
        match self {
            Locale::De => DE_WEEKDAYS[idx],
            Locale::En => EN_WEEKDAYS[idx],
        }
    }

    /// Month name for a 1-based month number.
    pub fn month_name(self, month: u32) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::De => DE_MONTHS[idx],
            Locale::En => EN_MONTHS[idx],
        }
    }

    /// Ordinal as used inside a rule description ("ersten", "first").
    pub fn position_name(self, position: Position) -> &'static str {
        match (self, position) {
            (Locale::De, Position::First) => "ersten",
            (Locale::De, Position::Second) => "zweiten",
            (Locale::De, Position::Third) => "dritten",
            (Locale::De, Position::Fourth) => "vierten",
            (Locale::De, Position::Last) => "letzten",
            (Locale::En, Position::First) => "first",
            (Locale::En, Position::Second) => "second",
            (Locale::En, Position::Third) => "third",
            (Locale::En, Position::Fourth) => "fourth",
            (Locale::En, Position::Last) => "last",
        }
    }

    /// `"Montag, 1. Januar 2025"` / `"Monday, January 1, 2025"`.
    pub fn format_long(self, date: NaiveDate) -> String {
        let weekday = self.weekday_name(date.weekday());
        let month = self.month_name(date.month());
        match self {
            Locale::De => format!("{weekday}, {}. {month} {}", date.day(), date.year()),
            Locale::En => format!("{weekday}, {month} {}, {}", date.day(), date.year()),
        }
    }

    /// `"01.01.2025"` / `"2025-01-01"`.
    pub fn format_short(self, date: NaiveDate) -> String {
        match self {
            Locale::De => date.format("%d.%m.%Y").to_string(),
            Locale::En => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Describe a rule in words, e.g. `"Jeden ersten Freitag im Monat, 6 Termine"`.
    pub fn describe(self, rule: &RecurrenceRule) -> String {
        let pattern = match self {
            Locale::De => self.describe_frequency_de(rule),
            Locale::En => self.describe_frequency_en(rule),
        };
        let end = match (self, rule.end) {
            (Locale::De, EndCondition::ByCount { count }) if count.get() == 1 => {
                "1 Termin".to_string()
            }
            (Locale::De, EndCondition::ByCount { count }) => format!("{count} Termine"),
            (Locale::De, EndCondition::ByDate { date }) => {
                format!("bis {}", self.format_short(date))
            }
            (Locale::En, EndCondition::ByCount { count }) if count.get() == 1 => {
                "1 occurrence".to_string()
            }
            (Locale::En, EndCondition::ByCount { count }) => format!("{count} occurrences"),
            (Locale::En, EndCondition::ByDate { date }) => {
                format!("until {}", self.format_short(date))
            }
        };
        format!("{pattern}, {end}")
    }

    fn describe_frequency_de(self, rule: &RecurrenceRule) -> String {
        match rule.frequency {
            Frequency::Daily => "Täglich".to_string(),
            Frequency::Weekly { days } if days.is_empty() => "Wöchentlich".to_string(),
            Frequency::Weekly { days } => {
                let names: Vec<&str> = days.iter().map(|d| self.weekday_name(d)).collect();
                format!("Jeden {}", join_words(&names, "und"))
            }
            Frequency::Monthly {
                pattern: MonthlyPattern::DayOfMonth { day },
            } => format!("Monatlich am {day}."),
            Frequency::Monthly {
                pattern: MonthlyPattern::WeekdayOfMonth { weekday, position },
            } => format!(
                "Jeden {} {} im Monat",
                self.position_name(position),
                self.weekday_name(weekday)
            ),
            Frequency::Yearly => format!(
                "Jährlich am {}. {}",
                rule.start.day(),
                self.month_name(rule.start.month())
            ),
            Frequency::Custom { every } => {
                let amount = every.amount.get();
                match (amount, every.unit) {
                    (1, IntervalUnit::Days) => "Jeden Tag".to_string(),
                    (1, IntervalUnit::Weeks) => "Jede Woche".to_string(),
                    (1, IntervalUnit::Months) => "Jeden Monat".to_string(),
                    (1, IntervalUnit::Years) => "Jedes Jahr".to_string(),
                    (n, IntervalUnit::Days) => format!("Alle {n} Tage"),
                    (n, IntervalUnit::Weeks) => format!("Alle {n} Wochen"),
                    (n, IntervalUnit::Months) => format!("Alle {n} Monate"),
                    (n, IntervalUnit::Years) => format!("Alle {n} Jahre"),
                }
            }
        }
    }

    fn describe_frequency_en(self, rule: &RecurrenceRule) -> String {
        match rule.frequency {
            Frequency::Daily => "Daily".to_string(),
            Frequency::Weekly { days } if days.is_empty() => "Weekly".to_string(),
            Frequency::Weekly { days } => {
                let names: Vec<&str> = days.iter().map(|d| self.weekday_name(d)).collect();
                format!("Every {}", join_words(&names, "and"))
            }
            Frequency::Monthly {
                pattern: MonthlyPattern::DayOfMonth { day },
            } => format!("Monthly on day {day}"),
            Frequency::Monthly {
                pattern: MonthlyPattern::WeekdayOfMonth { weekday, position },
            } => format!(
                "Every {} {} of the month",
                self.position_name(position),
                self.weekday_name(weekday)
            ),
            Frequency::Yearly => format!(
                "Yearly on {} {}",
                self.month_name(rule.start.month()),
                rule.start.day()
            ),
            Frequency::Custom { every } => {
                let unit = match every.unit {
                    IntervalUnit::Days => "day",
                    IntervalUnit::Weeks => "week",
                    IntervalUnit::Months => "month",
                    IntervalUnit::Years => "year",
                };
                match every.amount.get() {
                    1 => format!("Every {unit}"),
                    n => format!("Every {n} {unit}s"),
                }
            }
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "de" | "de-de" | "de_de" | "deutsch" | "german" => Ok(Locale::De),
            "en" | "en-us" | "en_us" | "en-gb" | "english" => Ok(Locale::En),
            other => Err(format!("unknown locale '{other}' (supported: de, en)")),
        }
    }
}

const DE_WEEKDAYS: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];

const EN_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const DE_WEEKDAYS_SHORT: [&str; 7] = ["mo", "di", "mi", "do", "fr", "sa", "so"];

const DE_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parse a weekday name in any supported locale, long or short, ignoring case
/// ("Montag", "mo", "Monday", "mon").
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(idx) = DE_WEEKDAYS
        .iter()
        .position(|d| d.to_lowercase() == needle)
        .or_else(|| DE_WEEKDAYS_SHORT.iter().position(|d| *d == needle))
    {
        return Some(WEEKDAYS[idx]);
    }
    needle.parse::<Weekday>().ok()
}

/// Parse an ordinal position in any supported locale, including the declined
/// German forms ("erste", "ersten", "erster", "first", "1").
pub fn parse_position(name: &str) -> Option<Position> {
    let needle = name.trim().to_lowercase();
    let stem = needle
        .strip_suffix("en")
        .or_else(|| needle.strip_suffix("er"))
        .or_else(|| needle.strip_suffix('e'))
        .unwrap_or(&needle);
    match (needle.as_str(), stem) {
        ("first" | "1", _) | (_, "erst") => Some(Position::First),
        ("second" | "2", _) | (_, "zweit") => Some(Position::Second),
        ("third" | "3", _) | (_, "dritt") => Some(Position::Third),
        ("fourth" | "4", _) | (_, "viert") => Some(Position::Fourth),
        ("last" | "-1", _) | (_, "letzt") => Some(Position::Last),
        _ => None,
    }
}

/// "A", "A und B", "A, B und C".
fn join_words(items: &[&str], and: &str) -> String {
    match items {
        [] => String::new(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{} {and} {last}", init.join(", ")),
    }
}
