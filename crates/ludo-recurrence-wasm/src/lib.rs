//! WASM bindings for ludo-recurrence.
//!
//! Exposes series generation, form preview, weekday alignment and rule
//! descriptions to the event form in the browser via `wasm-bindgen`. Rules,
//! form state and series cross the boundary as JSON strings; dates are
//! `YYYY-MM-DD` strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p ludo-recurrence-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/wasm/ \
//!   target/wasm32-unknown-unknown/release/ludo_recurrence_wasm.wasm
//! ```

use chrono::NaiveDate;
use ludo_recurrence::{
    locale, FixedClock, Locale, RecurrenceForm, RecurrenceRule, SeriesPlanner, Series, WeekdaySet,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SeriesDto {
    dates: Vec<String>,
    truncated: bool,
    clamped: bool,
}

impl From<&Series> for SeriesDto {
    fn from(series: &Series) -> Self {
        Self {
            dates: series.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
            truncated: series.truncated,
            clamped: series.clamped,
        }
    }
}

// ---------------------------------------------------------------------------
// Plain helpers (string errors, testable off-wasm)
// ---------------------------------------------------------------------------

fn parse_day(s: &str, what: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid {} '{}': {}", what, s, e))
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    s.parse::<Locale>()
}

fn series_json(series: &Series) -> Result<String, String> {
    serde_json::to_string(&SeriesDto::from(series)).map_err(|e| format!("Serialization error: {}", e))
}

fn generate_series_inner(rule_json: &str) -> Result<String, String> {
    let rule: RecurrenceRule =
        serde_json::from_str(rule_json).map_err(|e| format!("Invalid rule JSON: {}", e))?;
    series_json(&ludo_recurrence::generate(&rule))
}

fn preview_form_inner(form_json: &str, today: &str) -> Result<String, String> {
    let form: RecurrenceForm =
        serde_json::from_str(form_json).map_err(|e| format!("Invalid form JSON: {}", e))?;
    let today = parse_day(today, "today")?;
    let series = SeriesPlanner::new(FixedClock(today))
        .preview_form(&form)
        .map_err(|e| e.to_string())?;
    series_json(&series)
}

fn align_start_date_inner(start: &str, days_json: &str) -> Result<String, String> {
    let start = parse_day(start, "start date")?;
    let names: Vec<String> =
        serde_json::from_str(days_json).map_err(|e| format!("Invalid weekdays JSON: {}", e))?;
    let days = names
        .iter()
        .map(|name| locale::parse_weekday(name).ok_or_else(|| format!("Unknown weekday: '{}'", name)))
        .collect::<Result<WeekdaySet, String>>()?;
    Ok(ludo_recurrence::align_to_weekdays(start, &days)
        .format("%Y-%m-%d")
        .to_string())
}

fn describe_rule_inner(rule_json: &str, locale: &str) -> Result<String, String> {
    let rule: RecurrenceRule =
        serde_json::from_str(rule_json).map_err(|e| format!("Invalid rule JSON: {}", e))?;
    Ok(parse_locale(locale)?.describe(&rule))
}

fn format_date_inner(date: &str, locale: &str) -> Result<String, String> {
    Ok(parse_locale(locale)?.format_long(parse_day(date, "date")?))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Generate the dates of a recurrence rule, without caller-side validation.
///
/// `rule_json` is a serialized `RecurrenceRule`. Returns a JSON string
/// `{dates, truncated, clamped}` where `dates` are `YYYY-MM-DD` strings.
#[wasm_bindgen(js_name = "generateSeries")]
pub fn generate_series(rule_json: &str) -> Result<String, JsValue> {
    generate_series_inner(rule_json).map_err(|e| JsValue::from_str(&e))
}

/// Preview raw form state the way a submit would see it.
///
/// Converts the camelCase form state into a rule, rejects a start before
/// `today` and aligns weekly starts to the first selected weekday.
#[wasm_bindgen(js_name = "previewForm")]
pub fn preview_form(form_json: &str, today: &str) -> Result<String, JsValue> {
    preview_form_inner(form_json, today).map_err(|e| JsValue::from_str(&e))
}

/// Move `start` to the nearest selected weekday on or after it.
///
/// `days_json` is a JSON array of weekday names, German or English
/// (e.g. `["Montag", "thu"]`).
#[wasm_bindgen(js_name = "alignStartDate")]
pub fn align_start_date(start: &str, days_json: &str) -> Result<String, JsValue> {
    align_start_date_inner(start, days_json).map_err(|e| JsValue::from_str(&e))
}

/// Describe a rule in words, in the given locale ("de" or "en").
#[wasm_bindgen(js_name = "describeRule")]
pub fn describe_rule(rule_json: &str, locale: &str) -> Result<String, JsValue> {
    describe_rule_inner(rule_json, locale).map_err(|e| JsValue::from_str(&e))
}

/// Format a `YYYY-MM-DD` date in long form ("Montag, 6. Januar 2025").
#[wasm_bindgen(js_name = "formatDate")]
pub fn format_date(date: &str, locale: &str) -> Result<String, JsValue> {
    format_date_inner(date, locale).map_err(|e| JsValue::from_str(&e))
}
