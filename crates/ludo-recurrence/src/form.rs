//! Boundary between loosely-typed form state and [`RecurrenceRule`].
//!
//! The event form submits a flat object whose optional fields only matter for
//! some frequencies, with weekday and position names in either German or
//! English. Conversion fails fast with a message naming the offending field
//! so configuration mistakes surface during preview.

use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, Result};
use crate::locale;
use crate::rule::{
    EndCondition, Frequency, Interval, IntervalUnit, MonthlyPattern, RecurrenceRule, WeekdaySet,
};

/// Raw recurrence settings as submitted by the event form (camelCase JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurrenceForm {
    /// `YYYY-MM-DD` or `DD.MM.YYYY`.
    pub start_date: String,
    /// `daily`, `weekly`, `monthly`, `yearly` or `custom` (German names accepted).
    pub frequency: String,
    pub weekly_days: Vec<String>,
    /// `dayOfMonth` or `weekdayOfMonth`.
    pub monthly_type: Option<String>,
    pub monthly_day: Option<u8>,
    pub monthly_weekday: Option<String>,
    pub monthly_position: Option<String>,
    pub custom_amount: Option<u32>,
    /// `days`, `weeks`, `months` or `years`.
    pub custom_unit: Option<String>,
    /// `date` or `count`.
    pub end_type: String,
    pub end_date: Option<String>,
    pub occurrences: Option<u32>,
}

impl TryFrom<&RecurrenceForm> for RecurrenceRule {
    type Error = RecurrenceError;

    fn try_from(form: &RecurrenceForm) -> Result<Self> {
        let start = parse_date(&form.start_date, "startDate")?;
        let frequency = parse_frequency(form)?;
        let end = parse_end(form)?;
        Ok(RecurrenceRule::new(start, frequency, end))
    }
}

impl TryFrom<RecurrenceForm> for RecurrenceRule {
    type Error = RecurrenceError;

    fn try_from(form: RecurrenceForm) -> Result<Self> {
        RecurrenceRule::try_from(&form)
    }
}

/// Parse `YYYY-MM-DD` (or the German `DD.MM.YYYY`) as a local calendar date.
///
/// # Errors
/// Returns `RecurrenceError::InvalidDate` naming `field` if neither format matches.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"))
        .map_err(|e| RecurrenceError::InvalidDate(format!("{field} '{raw}': {e}")))
}

fn parse_frequency(form: &RecurrenceForm) -> Result<Frequency> {
    match form.frequency.trim().to_lowercase().as_str() {
        "daily" | "täglich" => Ok(Frequency::Daily),
        "weekly" | "wöchentlich" => {
            let days = parse_weekdays(&form.weekly_days)?;
            Ok(Frequency::Weekly { days })
        }
        "monthly" | "monatlich" => Ok(Frequency::Monthly {
            pattern: parse_monthly_pattern(form)?,
        }),
        "yearly" | "jährlich" => Ok(Frequency::Yearly),
        "custom" | "benutzerdefiniert" => Ok(Frequency::Custom {
            every: parse_interval(form)?,
        }),
        "" => Err(RecurrenceError::InvalidRule(
            "frequency is required".to_string(),
        )),
        other => Err(RecurrenceError::InvalidRule(format!(
            "unknown frequency '{other}'"
        ))),
    }
}

fn parse_weekdays(names: &[String]) -> Result<WeekdaySet> {
    names
        .iter()
        .map(|name| {
            locale::parse_weekday(name).ok_or_else(|| {
                RecurrenceError::InvalidRule(format!("weeklyDays: unknown weekday '{name}'"))
            })
        })
        .collect()
}

fn parse_monthly_pattern(form: &RecurrenceForm) -> Result<MonthlyPattern> {
    let Some(kind) = form.monthly_type.as_deref() else {
        return Err(RecurrenceError::InvalidRule(
            "monthly frequency requires a monthly pattern (monthlyType)".to_string(),
        ));
    };

    match kind.trim() {
        "dayOfMonth" | "day_of_month" | "day" => {
            let day = form.monthly_day.ok_or_else(|| {
                RecurrenceError::InvalidRule(
                    "monthlyType 'dayOfMonth' requires monthlyDay".to_string(),
                )
            })?;
            Ok(MonthlyPattern::DayOfMonth { day })
        }
        "weekdayOfMonth" | "weekday_of_month" | "weekday" => {
            let weekday_name = form.monthly_weekday.as_deref().ok_or_else(|| {
                RecurrenceError::InvalidRule(
                    "monthlyType 'weekdayOfMonth' requires monthlyWeekday".to_string(),
                )
            })?;
            let weekday = locale::parse_weekday(weekday_name).ok_or_else(|| {
                RecurrenceError::InvalidRule(format!(
                    "monthlyWeekday: unknown weekday '{weekday_name}'"
                ))
            })?;
            let position_name = form.monthly_position.as_deref().ok_or_else(|| {
                RecurrenceError::InvalidRule(
                    "monthlyType 'weekdayOfMonth' requires monthlyPosition".to_string(),
                )
            })?;
            let position = locale::parse_position(position_name).ok_or_else(|| {
                RecurrenceError::InvalidRule(format!(
                    "monthlyPosition: unknown position '{position_name}'"
                ))
            })?;
            Ok(MonthlyPattern::WeekdayOfMonth { weekday, position })
        }
        other => Err(RecurrenceError::InvalidRule(format!(
            "unknown monthlyType '{other}'"
        ))),
    }
}

fn parse_interval(form: &RecurrenceForm) -> Result<Interval> {
    let amount = form
        .custom_amount
        .and_then(NonZeroU32::new)
        .ok_or_else(|| {
            RecurrenceError::InvalidRule(
                "custom frequency requires a positive customAmount".to_string(),
            )
        })?;
    let unit_name = form.custom_unit.as_deref().ok_or_else(|| {
        RecurrenceError::InvalidRule("custom frequency requires customUnit".to_string())
    })?;
    let unit = match unit_name.trim().to_lowercase().as_str() {
        "day" | "days" | "tag" | "tage" => IntervalUnit::Days,
        "week" | "weeks" | "woche" | "wochen" => IntervalUnit::Weeks,
        "month" | "months" | "monat" | "monate" => IntervalUnit::Months,
        "year" | "years" | "jahr" | "jahre" => IntervalUnit::Years,
        other => {
            return Err(RecurrenceError::InvalidRule(format!(
                "unknown customUnit '{other}'"
            )))
        }
    };
    Ok(Interval::new(amount, unit))
}

fn parse_end(form: &RecurrenceForm) -> Result<EndCondition> {
    match form.end_type.trim() {
        "date" | "byDate" | "by_date" => {
            let raw = form.end_date.as_deref().ok_or_else(|| {
                RecurrenceError::InvalidRule("endType 'date' requires endDate".to_string())
            })?;
            Ok(EndCondition::ByDate {
                date: parse_date(raw, "endDate")?,
            })
        }
        "count" | "byCount" | "by_count" => {
            let count = form.occurrences.and_then(NonZeroU32::new).ok_or_else(|| {
                RecurrenceError::InvalidRule(
                    "endType 'count' requires a positive occurrences value".to_string(),
                )
            })?;
            Ok(EndCondition::ByCount { count })
        }
        "" => Err(RecurrenceError::InvalidRule(
            "endType is required".to_string(),
        )),
        other => Err(RecurrenceError::InvalidRule(format!(
            "unknown endType '{other}'"
        ))),
    }
}
