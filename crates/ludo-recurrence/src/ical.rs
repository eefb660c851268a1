//! iCalendar (RFC 5545) export for "add to calendar" downloads.
//!
//! Each instance becomes its own `VEVENT` with UTC times, so the file
//! reproduces the generated series exactly instead of re-deriving it from an
//! RRULE in the client.

use chrono::{DateTime, Utc};

use crate::instance::EventInstance;

const PRODID: &str = "-//Ludo Events//ludo-recurrence//DE";
/// Content lines longer than this many octets are folded (RFC 5545 3.1).
const MAX_LINE_OCTETS: usize = 75;

/// Render `instances` as a `VCALENDAR` document with CRLF line endings.
///
/// `stamp` becomes every event's `DTSTAMP`, keeping the output deterministic.
pub fn to_ics(instances: &[EventInstance], stamp: DateTime<Utc>) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");

    for instance in instances {
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}", event_uid(instance)));
        push_line(&mut out, &format!("DTSTAMP:{}", utc_stamp(stamp)));
        push_line(&mut out, &format!("DTSTART:{}", utc_stamp(instance.starts_at)));
        push_line(&mut out, &format!("DTEND:{}", utc_stamp(instance.ends_at)));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&instance.title)));
        if let Some(description) = &instance.description {
            push_line(&mut out, &format!("DESCRIPTION:{}", escape_text(description)));
        }
        if let Some(location) = &instance.location {
            push_line(&mut out, &format!("LOCATION:{}", escape_text(location)));
        }
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

/// Stable per-instance identifier: `<series>-<yyyymmdd>@ludo-events`.
pub fn event_uid(instance: &EventInstance) -> String {
    format!(
        "{}-{}@ludo-events",
        instance.series_id,
        instance.date.format("%Y%m%d")
    )
}

fn utc_stamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape TEXT values: backslash, semicolon, comma and newlines.
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Append `line` folded at 75 octets, never splitting a UTF-8 sequence.
fn push_line(out: &mut String, line: &str) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > budget {
            out.push_str("\r\n ");
            used = 0;
            // The leading space of a continuation line counts.
            budget = MAX_LINE_OCTETS - 1;
        }
        out.push(c);
        used += c.len_utf8();
    }
    out.push_str("\r\n");
}
