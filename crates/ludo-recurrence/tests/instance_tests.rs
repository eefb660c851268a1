//! Tests for materializing instances, DST resolution and iCalendar export.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use ludo_recurrence::dst::resolve_local;
use ludo_recurrence::ical::{event_uid, to_ics};
use ludo_recurrence::{materialize, DstPolicy, EventTemplate, RecurrenceError, Series};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn series(dates: Vec<NaiveDate>) -> Series {
    Series {
        dates,
        truncated: false,
        clamped: false,
    }
}

fn template(start: NaiveTime, end: NaiveTime) -> EventTemplate {
    EventTemplate {
        series_id: "spieleabend".to_string(),
        title: "Spieleabend".to_string(),
        description: Some("Brettspiele, Snacks; gute Laune".to_string()),
        location: None,
        capacity: None,
        start_time: start,
        end_time: end,
        timezone: "Europe/Berlin".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Materialization
// ---------------------------------------------------------------------------

#[test]
fn winter_and_summer_offsets() {
    let instances = materialize(
        &template(t(19, 0), t(23, 0)),
        &series(vec![d(2025, 1, 8), d(2025, 7, 2)]),
        DstPolicy::default(),
    )
    .expect("should materialize");

    // CET is UTC+1.
    assert_eq!(
        instances[0].starts_at,
        Utc.with_ymd_and_hms(2025, 1, 8, 18, 0, 0).unwrap()
    );
    assert_eq!(
        instances[0].ends_at,
        Utc.with_ymd_and_hms(2025, 1, 8, 22, 0, 0).unwrap()
    );
    // CEST is UTC+2.
    assert_eq!(
        instances[1].starts_at,
        Utc.with_ymd_and_hms(2025, 7, 2, 17, 0, 0).unwrap()
    );
}

#[test]
fn overnight_event_ends_next_day() {
    let instances = materialize(
        &template(t(20, 0), t(1, 0)),
        &series(vec![d(2025, 1, 10)]),
        DstPolicy::default(),
    )
    .expect("should materialize");

    assert_eq!(
        instances[0].starts_at,
        Utc.with_ymd_and_hms(2025, 1, 10, 19, 0, 0).unwrap()
    );
    assert_eq!(
        instances[0].ends_at,
        Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 0).unwrap()
    );
    assert_eq!(instances[0].date, d(2025, 1, 10));
}

#[test]
fn unknown_timezone_is_rejected() {
    let mut bad = template(t(19, 0), t(23, 0));
    bad.timezone = "Europe/Atlantis".to_string();
    assert_eq!(
        materialize(&bad, &series(vec![d(2025, 1, 8)]), DstPolicy::default()),
        Err(RecurrenceError::InvalidTimezone("Europe/Atlantis".to_string()))
    );
}

// ---------------------------------------------------------------------------
// DST
// ---------------------------------------------------------------------------

#[test]
fn spring_forward_gap_shifts_forward() {
    // Clocks jump from 02:00 to 03:00 CET/CEST on 2025-03-30.
    let instances = materialize(
        &template(t(2, 30), t(4, 0)),
        &series(vec![d(2025, 3, 30)]),
        DstPolicy::ShiftForward,
    )
    .expect("should materialize");

    // 02:30 read with the pre-gap offset (+1) is 01:30 UTC = 03:30 CEST.
    assert_eq!(
        instances[0].starts_at,
        Utc.with_ymd_and_hms(2025, 3, 30, 1, 30, 0).unwrap()
    );
    assert_eq!(
        instances[0].ends_at,
        Utc.with_ymd_and_hms(2025, 3, 30, 2, 0, 0).unwrap()
    );
}

#[test]
fn spring_forward_gap_skips_when_asked() {
    let instances = materialize(
        &template(t(2, 30), t(4, 0)),
        &series(vec![d(2025, 3, 29), d(2025, 3, 30), d(2025, 3, 31)]),
        DstPolicy::Skip,
    )
    .expect("should materialize");

    let dates: Vec<NaiveDate> = instances.iter().map(|i| i.date).collect();
    assert_eq!(dates, vec![d(2025, 3, 29), d(2025, 3, 31)]);
    // Sequence numbers keep the position in the series.
    let sequences: Vec<u32> = instances.iter().map(|i| i.sequence).collect();
    assert_eq!(sequences, vec![1, 3]);
}

#[test]
fn fall_back_ambiguity_takes_earlier_instant() {
    // 02:30 happens twice on 2025-10-26; the first one is still CEST (+2).
    let resolved = resolve_local(
        chrono_tz::Europe::Berlin,
        d(2025, 10, 26).and_time(t(2, 30)),
        DstPolicy::Skip,
    );
    assert_eq!(
        resolved,
        Some(Utc.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap())
    );
}

// ---------------------------------------------------------------------------
// iCalendar
// ---------------------------------------------------------------------------

#[test]
fn ics_contains_one_event_per_instance() {
    let instances = materialize(
        &template(t(19, 0), t(23, 0)),
        &series(vec![d(2025, 1, 8), d(2025, 1, 15)]),
        DstPolicy::default(),
    )
    .expect("should materialize");
    let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
    let ics = to_ics(&instances, stamp);

    assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    assert!(ics.contains("UID:spieleabend-20250108@ludo-events\r\n"));
    assert!(ics.contains("DTSTAMP:20250101T120000Z\r\n"));
    assert!(ics.contains("DTSTART:20250108T180000Z\r\n"));
    assert!(ics.contains("DTEND:20250115T220000Z\r\n"));
    assert!(ics.contains("DESCRIPTION:Brettspiele\\, Snacks\\; gute Laune\r\n"));
    assert!(!ics.contains("LOCATION:"));
    assert_eq!(event_uid(&instances[1]), "spieleabend-20250115@ludo-events");
}

#[test]
fn ics_folds_long_lines() {
    let mut long = template(t(19, 0), t(23, 0));
    long.description = Some("Würfel ".repeat(30));
    let instances = materialize(&long, &series(vec![d(2025, 1, 8)]), DstPolicy::default())
        .expect("should materialize");
    let ics = to_ics(&instances, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

    for line in ics.split("\r\n") {
        assert!(line.len() <= 75, "line too long ({} octets): {line}", line.len());
    }
    assert!(ics.contains("\r\n "), "expected a folded continuation line");
}
