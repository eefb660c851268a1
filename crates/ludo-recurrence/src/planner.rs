//! Caller-side policy around the expander.
//!
//! The expander accepts any well-formed rule. The event form is stricter:
//! series may not start in the past, a custom interval must be at least 2
//! (amount 1 duplicates a simple frequency), and a weekly series starts on
//! the first selected weekday. [`SeriesPlanner`] applies those rules, runs
//! the expander, and hands the resulting instances to an [`InstanceSink`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::clock::Clock;
use crate::dst::DstPolicy;
use crate::error::{RecurrenceError, Result};
use crate::expander::{self, GenerateOptions, Series};
use crate::form::RecurrenceForm;
use crate::instance::{self, EventInstance, EventTemplate, InstanceSink};
use crate::rule::{EndCondition, Frequency, RecurrenceRule};

/// Smallest amount accepted for a custom interval.
pub const MIN_CUSTOM_AMOUNT: u32 = 2;

/// Outcome of [`SeriesPlanner::submit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReport {
    pub series_id: String,
    pub created: usize,
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
    pub truncated: bool,
    pub clamped: bool,
}

#[derive(Debug, Clone)]
pub struct SeriesPlanner<C: Clock> {
    clock: C,
    options: GenerateOptions,
    dst_policy: DstPolicy,
}

impl<C: Clock> SeriesPlanner<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            options: GenerateOptions::default(),
            dst_policy: DstPolicy::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.dst_policy = policy;
        self
    }

    /// The reference date for start-date validation.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validate `rule` against the form policy and return the rule the
    /// expander should see (weekly starts aligned to a selected weekday).
    ///
    /// # Errors
    /// Returns `RecurrenceError::Validation` if the start lies before today,
    /// a custom interval is below [`MIN_CUSTOM_AMOUNT`], or the end date lies
    /// before the first occurrence.
    pub fn prepare(&self, rule: &RecurrenceRule) -> Result<RecurrenceRule> {
        let today = self.today();
        if rule.start < today {
            return Err(RecurrenceError::Validation(format!(
                "start date {} lies before today ({today})",
                rule.start
            )));
        }

        let start = match rule.frequency {
            Frequency::Custom { every } if every.amount.get() < MIN_CUSTOM_AMOUNT => {
                return Err(RecurrenceError::Validation(format!(
                    "custom interval must be at least {MIN_CUSTOM_AMOUNT}, got {}",
                    every.amount
                )));
            }
            Frequency::Weekly { days } => calendar::align_to_weekdays(rule.start, &days),
            _ => rule.start,
        };

        if let EndCondition::ByDate { date } = rule.end {
            if date < start {
                return Err(RecurrenceError::Validation(format!(
                    "end date {date} lies before the first occurrence ({start})"
                )));
            }
        }

        if start != rule.start {
            tracing::debug!(from = %rule.start, to = %start, "Aligned start to selected weekday");
        }
        Ok(rule.with_start(start))
    }

    /// Prepare and expand `rule`.
    ///
    /// # Errors
    /// See [`SeriesPlanner::prepare`].
    pub fn preview(&self, rule: &RecurrenceRule) -> Result<Series> {
        let prepared = self.prepare(rule)?;
        Ok(expander::generate_with_options(&prepared, &self.options))
    }

    /// Convert raw form state and preview it.
    ///
    /// # Errors
    /// Returns `InvalidRule`/`InvalidDate` for malformed form state, otherwise
    /// see [`SeriesPlanner::prepare`].
    pub fn preview_form(&self, form: &RecurrenceForm) -> Result<Series> {
        let rule = RecurrenceRule::try_from(form)?;
        self.preview(&rule)
    }

    /// Prepare, expand and materialize `rule` into event instances.
    ///
    /// # Errors
    /// Returns `RecurrenceError::Validation` for an unusable template or a rule
    /// producing no dates, `InvalidTimezone` for an unknown timezone, otherwise
    /// see [`SeriesPlanner::prepare`].
    pub fn plan(
        &self,
        rule: &RecurrenceRule,
        template: &EventTemplate,
    ) -> Result<(Series, Vec<EventInstance>)> {
        validate_template(template)?;
        let series = self.preview(rule)?;
        if series.is_empty() {
            return Err(RecurrenceError::Validation(
                "rule produces no dates".to_string(),
            ));
        }
        if series.truncated {
            tracing::warn!(
                series_id = %template.series_id,
                emitted = series.len(),
                "Series truncated by safety cap"
            );
        }
        let instances = instance::materialize(template, &series, self.dst_policy)?;
        Ok((series, instances))
    }

    /// Plan the series and store its instances in `sink`.
    ///
    /// # Errors
    /// See [`SeriesPlanner::plan`]; sink failures are returned as
    /// `RecurrenceError::Sink`.
    pub fn submit<S: InstanceSink + ?Sized>(
        &self,
        rule: &RecurrenceRule,
        template: &EventTemplate,
        sink: &mut S,
    ) -> Result<SubmitReport> {
        let (series, instances) = self.plan(rule, template)?;
        let created = sink.create_instances(&instances)?;

        tracing::info!(
            series_id = %template.series_id,
            frequency = %rule.frequency,
            created,
            "Series submitted"
        );

        Ok(SubmitReport {
            series_id: template.series_id.clone(),
            created,
            first: instances.first().map(|i| i.date),
            last: instances.last().map(|i| i.date),
            truncated: series.truncated,
            clamped: series.clamped,
        })
    }
}

fn validate_template(template: &EventTemplate) -> Result<()> {
    if template.title.trim().is_empty() {
        return Err(RecurrenceError::Validation(
            "event title must not be empty".to_string(),
        ));
    }
    if template.series_id.trim().is_empty() {
        return Err(RecurrenceError::Validation(
            "series id must not be empty".to_string(),
        ));
    }
    if template.capacity == Some(0) {
        return Err(RecurrenceError::Validation(
            "capacity must be positive when set".to_string(),
        ));
    }
    Ok(())
}
