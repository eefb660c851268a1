//! # ludo-recurrence
//!
//! Deterministic date generation for recurring Ludo community events.
//!
//! Given a start date and a recurrence rule (daily, weekly on a set of
//! weekdays, monthly on a day or "n-th weekday", yearly, or a custom interval)
//! the engine produces the ordered list of calendar dates on which the event
//! takes place, ending by count or by an inclusive end date, and bounded by a
//! safety cap.
//!
//! ```rust
//! use std::num::NonZeroU32;
//! use chrono::NaiveDate;
//! use ludo_recurrence::{generate, EndCondition, Frequency, Interval, IntervalUnit, RecurrenceRule};
//!
//! let rule = RecurrenceRule::new(
//!     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     Frequency::Custom {
//!         every: Interval::new(NonZeroU32::new(3).unwrap(), IntervalUnit::Weeks),
//!     },
//!     EndCondition::ByCount { count: NonZeroU32::new(4).unwrap() },
//! );
//! let series = generate(&rule);
//! assert_eq!(series.last(), NaiveDate::from_ymd_opt(2025, 3, 5));
//! ```
//!
//! ## Modules
//!
//! - [`rule`] — rule types (`RecurrenceRule`, `Frequency`, `MonthlyPattern`, ...)
//! - [`expander`] — rule → series of dates, with the safety cap
//! - [`calendar`] — month/weekday arithmetic on plain dates
//! - [`form`] — loosely-typed form state → rule, with field-level errors
//! - [`locale`] — German/English names, date formatting, rule descriptions
//! - [`clock`] — injected "today"
//! - [`planner`] — caller-side policy, preview and submit
//! - [`instance`] — per-date event instances and the persistence sink
//! - [`dst`] — DST gap policies for instance times
//! - [`ical`] — iCalendar export
//! - [`error`] — Error types

pub mod calendar;
pub mod clock;
pub mod dst;
pub mod error;
pub mod expander;
pub mod form;
pub mod ical;
pub mod instance;
pub mod locale;
pub mod planner;
pub mod rule;

pub use calendar::align_to_weekdays;
pub use clock::{Clock, FixedClock, SystemClock};
pub use dst::DstPolicy;
pub use error::RecurrenceError;
pub use expander::{generate, generate_with_options, GenerateOptions, Series, DEFAULT_SAFETY_CAP};
pub use form::RecurrenceForm;
pub use instance::{materialize, EventInstance, EventTemplate, InstanceSink, JsonLinesSink, MemorySink};
pub use locale::Locale;
pub use planner::{SeriesPlanner, SubmitReport};
pub use rule::{
    EndCondition, Frequency, Interval, IntervalUnit, MonthlyPattern, Position, RecurrenceRule,
    WeekdaySet,
};
