//! Event instances: one concrete, persisted occurrence per generated date.
//!
//! [`materialize`] combines a [`Series`] with the per-event metadata of an
//! [`EventTemplate`] and resolves the local time window of each date to UTC in
//! the template's timezone. An [`InstanceSink`] then stores the instances;
//! the engine has no knowledge of how.

use std::io::Write;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::{self, DstPolicy};
use crate::error::{RecurrenceError, Result};
use crate::expander::Series;

/// Per-event metadata shared by every instance of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub series_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Maximum number of participants, if limited.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Local start time on each date.
    pub start_time: NaiveTime,
    /// Local end time. At or before `start_time` means the event runs past
    /// midnight and ends on the following day.
    pub end_time: NaiveTime,
    /// IANA timezone, e.g. "Europe/Berlin".
    pub timezone: String,
}

/// A single occurrence ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInstance {
    pub series_id: String,
    /// 1-based position of `date` in the series.
    pub sequence: u32,
    pub date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Turn every date of `series` into an [`EventInstance`].
///
/// # Errors
/// Returns `RecurrenceError::InvalidTimezone` if `template.timezone` is not a
/// valid IANA identifier.
pub fn materialize(
    template: &EventTemplate,
    series: &Series,
    policy: DstPolicy,
) -> Result<Vec<EventInstance>> {
    let tz: Tz = template
        .timezone
        .parse()
        .map_err(|_| RecurrenceError::InvalidTimezone(template.timezone.clone()))?;

    let overnight = template.end_time <= template.start_time;
    let mut instances = Vec::with_capacity(series.len());

    for (index, date) in series.iter().enumerate() {
        let end_date = if overnight {
            date.checked_add_days(Days::new(1)).ok_or_else(|| {
                RecurrenceError::InvalidDate(format!("no day after {date}"))
            })?
        } else {
            *date
        };

        let starts_at = dst::resolve_local(tz, date.and_time(template.start_time), policy);
        let ends_at = dst::resolve_local(tz, end_date.and_time(template.end_time), policy);
        let (Some(starts_at), Some(ends_at)) = (starts_at, ends_at) else {
            tracing::debug!(
                date = %date,
                timezone = %template.timezone,
                "Skipping instance in DST gap"
            );
            continue;
        };

        instances.push(EventInstance {
            series_id: template.series_id.clone(),
            sequence: u32::try_from(index + 1).unwrap_or(u32::MAX),
            date: *date,
            title: template.title.clone(),
            description: template.description.clone(),
            location: template.location.clone(),
            capacity: template.capacity,
            starts_at,
            ends_at,
        });
    }

    Ok(instances)
}

/// Destination for generated instances (a database table, a file, ...).
pub trait InstanceSink {
    /// Store `instances` and return how many were created.
    ///
    /// # Errors
    /// Returns `RecurrenceError::Sink` if the instances could not be stored.
    fn create_instances(&mut self, instances: &[EventInstance]) -> Result<usize>;
}

/// Keeps instances in memory. Useful for previews and tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub instances: Vec<EventInstance>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstanceSink for MemorySink {
    fn create_instances(&mut self, instances: &[EventInstance]) -> Result<usize> {
        self.instances.extend_from_slice(instances);
        Ok(instances.len())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> InstanceSink for JsonLinesSink<W> {
    fn create_instances(&mut self, instances: &[EventInstance]) -> Result<usize> {
        for instance in instances {
            serde_json::to_writer(&mut self.writer, instance)
                .map_err(|e| RecurrenceError::Sink(e.to_string()))?;
            self.writer
                .write_all(b"\n")
                .map_err(|e| RecurrenceError::Sink(e.to_string()))?;
        }
        self.writer
            .flush()
            .map_err(|e| RecurrenceError::Sink(e.to_string()))?;
        Ok(instances.len())
    }
}
