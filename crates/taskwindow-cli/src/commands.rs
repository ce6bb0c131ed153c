//! Command dispatch.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::Serialize;
use taskwindow::{
    clock_pair, resolve_absolute, resolve_clock_or_absolute, resolve_window, window_duration,
    Clock, ExplicitPolicy, FixedClock, ReminderRequest, ResolvedWindow, RoutineRequest,
    SystemClock, TaskRequest, TimeInput, WindowDuration, WindowMode, WindowOptions,
};
use tracing::debug;

use crate::cli::{Cli, Command};

/// One resolved instant.
#[derive(Debug, Serialize)]
struct ResolvedTime {
    utc: String,
    local: String,
    timezone: String,
}

/// A resolved window with its presentation forms.
#[derive(Debug, Serialize)]
struct WindowReport {
    start: String,
    end: String,
    start_local: String,
    end_local: String,
    start_clock: String,
    end_clock: String,
    timezone: String,
    duration: WindowDuration,
}

/// Run a parsed command, writing JSON to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let options = WindowOptions::with_timezone(&cli.tz)?;
    let anchor = clock_from(cli.now.as_deref())?.now();
    debug!(%anchor, timezone = %options.timezone, "resolved anchor");

    match cli.command {
        Command::Resolve {
            input,
            hour,
            absolute_only,
        } => {
            let input = if hour {
                hour_input(&input)?
            } else {
                TimeInput::Text(input)
            };
            let at = if absolute_only {
                resolve_absolute(&input, &options)?
            } else {
                resolve_clock_or_absolute(anchor, &input, &options)?
            };
            emit(out, &describe_instant(at, &options.timezone))
        }
        Command::Window {
            start,
            end,
            hours,
            absolute_only,
        } => {
            let (start, end, mode) = if hours {
                (hour_input(&start)?, hour_input(&end)?, WindowMode::HourPair)
            } else {
                let policy = if absolute_only {
                    ExplicitPolicy::AbsoluteOnly
                } else {
                    ExplicitPolicy::ClockOrAbsolute
                };
                (
                    TimeInput::Text(start),
                    TimeInput::Text(end),
                    WindowMode::Explicit(policy),
                )
            };
            let window = resolve_window(anchor, &start, &end, mode, &options)?;
            emit(out, &describe_window(&window, &options.timezone))
        }
        Command::Task { file } => {
            let request: TaskRequest = read_body(&file)?;
            emit(out, &request.validate(anchor, &options)?)
        }
        Command::Routine { file } => {
            let request: RoutineRequest = read_body(&file)?;
            emit(out, &request.validate(anchor, &options)?)
        }
        Command::Reminder { file } => {
            let request: ReminderRequest = read_body(&file)?;
            emit(out, &request.validate(anchor, &options)?)
        }
    }
}

fn clock_from(now: Option<&str>) -> Result<Box<dyn Clock>> {
    match now {
        Some(now) => {
            let at = DateTime::parse_from_rfc3339(now)
                .with_context(|| format!("--now must be an RFC 3339 date-time, got '{now}'"))?;
            Ok(Box::new(FixedClock(at.with_timezone(&Utc))))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn hour_input(raw: &str) -> Result<TimeInput> {
    let hour: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("expected an hour-of-day number, got '{raw}'"))?;
    Ok(TimeInput::hour(hour))
}

fn read_body<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request body from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("request body is not valid JSON for this record")
}

fn describe_instant(at: DateTime<Utc>, tz: &Tz) -> ResolvedTime {
    ResolvedTime {
        utc: at.to_rfc3339(),
        local: at.with_timezone(tz).to_rfc3339(),
        timezone: tz.name().to_string(),
    }
}

fn describe_window(window: &ResolvedWindow, tz: &Tz) -> WindowReport {
    let (start_clock, end_clock) = clock_pair(window, tz);
    WindowReport {
        start: window.start().to_rfc3339(),
        end: window.end().to_rfc3339(),
        start_local: window.start().with_timezone(tz).to_rfc3339(),
        end_local: window.end().with_timezone(tz).to_rfc3339(),
        start_clock,
        end_clock,
        timezone: tz.name().to_string(),
        duration: window_duration(window),
    }
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
