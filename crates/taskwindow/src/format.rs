//! Presenting resolved windows: clock-time pairs and duration breakdowns.

use chrono::Timelike;
use chrono_tz::Tz;
use serde::Serialize;

use crate::window::ResolvedWindow;

/// `"HH:mm"` for the window's start and end, read in `tz`.
///
/// The inverse of clock-string resolution: a window resolved from
/// `("22:00", "06:00")` formats back to the same pair, minus the date.
pub fn clock_pair(window: &ResolvedWindow, tz: &Tz) -> (String, String) {
    let start = window.start().with_timezone(tz);
    let end = window.end().with_timezone(tz);
    (
        start.format("%H:%M").to_string(),
        end.format("%H:%M").to_string(),
    )
}

/// Hour of day of the window's start and end, read in `tz`.
pub fn hour_pair(window: &ResolvedWindow, tz: &Tz) -> (u32, u32) {
    (
        window.start().with_timezone(tz).hour(),
        window.end().with_timezone(tz).hour(),
    )
}

/// Length of a window, decomposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowDuration {
    pub total_seconds: i64,
    pub total_minutes: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// e.g. "8 hours", "1 day, 30 minutes".
    pub human_readable: String,
}

pub fn window_duration(window: &ResolvedWindow) -> WindowDuration {
    let total_seconds = window.duration().num_seconds();

    let days = total_seconds / 86400;
    let remainder = total_seconds % 86400;
    let hours = remainder / 3600;
    let remainder = remainder % 3600;
    let minutes = remainder / 60;
    let seconds = remainder % 60;

    WindowDuration {
        total_seconds,
        total_minutes: window.duration_minutes(),
        days,
        hours,
        minutes,
        seconds,
        human_readable: format_human_duration(days, hours, minutes, seconds),
    }
}

fn format_human_duration(days: i64, hours: i64, minutes: i64, seconds: i64) -> String {
    let mut parts = Vec::new();
    for (n, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        if n > 0 {
            parts.push(pluralize(n, unit));
        }
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(pluralize(seconds, "second"));
    }
    parts.join(", ")
}

fn pluralize(n: i64, unit: &str) -> String {
    format!("{n} {unit}{}", if n == 1 { "" } else { "s" })
}
