//! `ludo-dates` CLI — preview, describe and export recurring event series.
//!
//! ## Usage
//!
//! ```sh
//! # Preview the dates of a rule (stdin → stdout, JSON)
//! echo '{"start":"2025-01-01","frequency":{"kind":"daily"},"end":{"kind":"by_count","count":3}}' \
//!   | ludo-dates preview
//!
//! # Human-readable preview in German, from raw form state
//! ludo-dates preview --form -i form.json --format text --locale de
//!
//! # Move a start date to the next selected weekday
//! ludo-dates align --start 2025-01-01 --days mo,do
//!
//! # Describe a rule in words
//! ludo-dates describe -i rule.json --locale en
//!
//! # Materialize instances as JSON lines, or as an .ics file
//! ludo-dates instances -i request.json -o instances.jsonl
//! ludo-dates ics -i request.json -o spieleabend.ics
//! ```

mod config;

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use ludo_recurrence::{
    generate_with_options, ical, locale, Clock, EventTemplate, FixedClock, GenerateOptions,
    JsonLinesSink, Locale, RecurrenceForm, RecurrenceRule, SeriesPlanner, Series, SystemClock,
    WeekdaySet,
};
use serde::Deserialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use crate::config::{load_config, Settings};

#[derive(Parser)]
#[command(
    name = "ludo-dates",
    version,
    about = "Preview and export recurring Ludo event series"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./ludo-dates.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log filter, overrides the configured level (e.g. "debug")
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the dates of a recurrence rule
    Preview {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Input is raw form state (camelCase) instead of a rule
        #[arg(long)]
        form: bool,
        /// Skip start-date validation and weekday alignment
        #[arg(long)]
        raw: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Display locale for text output (de, en)
        #[arg(long)]
        locale: Option<Locale>,
        /// Reference date for validation (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Move a start date to the nearest selected weekday
    Align {
        #[arg(long)]
        start: NaiveDate,
        /// Comma-separated weekday names, German or English
        #[arg(long)]
        days: String,
    },
    /// Describe a recurrence rule in words
    Describe {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Materialize a series into event instances (JSON lines)
    Instances {
        /// Request file with `rule` and `template` (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Export a series as an iCalendar file
    Ics {
        /// Request file with `rule` and `template` (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// A rule plus the event metadata for its instances.
#[derive(Deserialize)]
struct SeriesRequest {
    rule: RecurrenceRule,
    template: EventTemplate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .init();

    let settings = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(settings = ?settings, "Configuration loaded");

    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    match EnvFilter::try_new(level) {
        Ok(filter) => {
            if let Err(e) = filter_handle.modify(|current| *current = filter) {
                tracing::warn!(error = %e, "Failed to update log filter");
            }
        }
        Err(_) => tracing::warn!(level = %level, "Invalid log level, keeping warn"),
    }

    match cli.command {
        Commands::Preview {
            input,
            output,
            form,
            raw,
            format,
            locale,
            today,
        } => {
            let text = read_input(input.as_deref())?;
            let rule = parse_rule(&text, form)?;
            let series = if raw {
                generate_with_options(&rule, &generate_options(&settings))
            } else {
                planner(&settings, today)
                    .preview(&rule)
                    .context("Failed to preview series")?
            };

            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&series)?,
                OutputFormat::Text => {
                    render_text(&rule, &series, locale.unwrap_or(settings.display.locale))
                }
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Align { start, days } => {
            let days = parse_days(&days)?;
            println!("{}", ludo_recurrence::align_to_weekdays(start, &days));
        }
        Commands::Describe { input, locale } => {
            let text = read_input(input.as_deref())?;
            let rule = parse_rule(&text, false)?;
            println!(
                "{}",
                locale.unwrap_or(settings.display.locale).describe(&rule)
            );
        }
        Commands::Instances {
            input,
            output,
            today,
        } => {
            let request = read_request(input.as_deref())?;
            let mut sink = JsonLinesSink::new(Vec::new());
            let report = planner(&settings, today)
                .submit(&request.rule, &request.template, &mut sink)
                .context("Failed to materialize instances")?;
            tracing::info!(created = report.created, "Instances written");

            let body =
                String::from_utf8(sink.into_inner()).context("Sink produced invalid UTF-8")?;
            write_output(output.as_deref(), &body)?;
        }
        Commands::Ics {
            input,
            output,
            today,
        } => {
            let request = read_request(input.as_deref())?;
            let (_, instances) = planner(&settings, today)
                .plan(&request.rule, &request.template)
                .context("Failed to materialize instances")?;
            write_output(output.as_deref(), &ical::to_ics(&instances, Utc::now()))?;
        }
    }

    Ok(())
}

fn generate_options(settings: &Settings) -> GenerateOptions {
    GenerateOptions {
        safety_cap: settings.generation.safety_cap,
    }
}

fn planner(settings: &Settings, today: Option<NaiveDate>) -> SeriesPlanner<FixedClock> {
    let today = today.unwrap_or_else(|| SystemClock.today());
    SeriesPlanner::new(FixedClock(today))
        .with_options(generate_options(settings))
        .with_dst_policy(settings.generation.dst_policy)
}

/// Parse either a typed rule or raw form state.
fn parse_rule(text: &str, form: bool) -> Result<RecurrenceRule> {
    if form {
        let form: RecurrenceForm =
            serde_json::from_str(text).context("Failed to parse form JSON")?;
        Ok(RecurrenceRule::try_from(&form)?)
    } else {
        serde_json::from_str(text).context("Failed to parse rule JSON")
    }
}

fn parse_days(raw: &str) -> Result<WeekdaySet> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            locale::parse_weekday(part)
                .with_context(|| format!("Unknown weekday: '{}'", part))
        })
        .collect()
}

fn render_text(rule: &RecurrenceRule, series: &Series, locale: Locale) -> String {
    let mut lines = vec![locale.describe(rule)];
    for (i, date) in series.iter().enumerate() {
        lines.push(format!("{:>4}  {}", i + 1, locale.format_long(*date)));
    }
    if series.truncated {
        lines.push(format!("(truncated after {} dates)", series.len()));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn read_request(path: Option<&str>) -> Result<SeriesRequest> {
    let text = read_input(path)?;
    serde_json::from_str(&text).context("Failed to parse request JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
