//! Time-window resolution for tasks and routines.
//!
//! Turns the loosely typed time values found in request bodies (hour-of-day
//! numbers, `"HH:mm"` strings, full date-time strings) into absolute UTC
//! instants, and pairs of them into a validated [`ResolvedWindow`].
//!
//! All functions are pure: the caller passes the "now" anchor explicitly
//! (see [`crate::clock`]), and "today" is the anchor's calendar date in the
//! configured timezone.
//!
//! # Functions
//!
//! - [`resolve_clock_or_absolute`] — `"HH:mm"`, hour number, or date-time string → instant
//! - [`resolve_absolute`] — full date-time string → instant
//! - [`resolve_hour_pair`] — two hours of day → window, rolling over midnight
//! - [`resolve_window`] — two raw inputs + a [`WindowMode`] → window
//!
//! # Rollover
//!
//! In hour-pair mode an end hour that is not after the start hour moves the
//! end to the next calendar day. `22 → 6` is an overnight window and
//! `9 → 9` is a full 24-hour window, never a zero-length error.

use std::fmt;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};

/// Naive date-time layouts accepted as absolute input, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// ── Inputs ──────────────────────────────────────────────────────────────────

/// A raw time value as it arrives in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeInput {
    Number(serde_json::Number),
    Text(String),
}

impl TimeInput {
    pub fn hour(hour: i64) -> Self {
        TimeInput::Number(hour.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        TimeInput::Text(value.into())
    }

    /// An empty or whitespace-only string, which request bodies use for "not given".
    pub fn is_blank(&self) -> bool {
        matches!(self, TimeInput::Text(s) if s.trim().is_empty())
    }
}

impl From<i64> for TimeInput {
    fn from(hour: i64) -> Self {
        TimeInput::hour(hour)
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        TimeInput::text(value)
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        TimeInput::Text(value)
    }
}

impl fmt::Display for TimeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInput::Number(n) => write!(f, "{n}"),
            TimeInput::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// A classified time value, before it is anchored to a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSpec {
    /// A date-time string parsed when resolved.
    Absolute(String),
    /// A time of day on the anchor's date.
    ClockTime { hour: u32, minute: u32 },
    /// An hour of day on the anchor's date, minute 0.
    Hour(u32),
}

impl TimeSpec {
    /// Classify a raw input: numbers are hours, strings with a colon are
    /// clock times, anything else is an absolute date-time.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidFormat`] for a malformed clock string and
    /// [`ScheduleError::OutOfRange`] for an hour or minute outside its domain.
    /// Absolute strings are only checked by [`TimeSpec::resolve`].
    pub fn parse(input: &TimeInput) -> Result<TimeSpec> {
        match input {
            TimeInput::Number(n) => hour_of_day(n).map(TimeSpec::Hour),
            TimeInput::Text(s) if s.contains(':') => parse_clock(s),
            TimeInput::Text(s) => Ok(TimeSpec::Absolute(s.clone())),
        }
    }

    /// Anchor to the given instant's date.
    pub fn resolve(&self, anchor: DateTime<Utc>, options: &WindowOptions) -> Result<DateTime<Utc>> {
        let tz = options.timezone;
        match self {
            TimeSpec::Absolute(s) => parse_absolute(s, &tz),
            TimeSpec::ClockTime { hour, minute } => {
                at_local(local_today(anchor, &tz), *hour, *minute, &tz)
            }
            TimeSpec::Hour(hour) => at_local(local_today(anchor, &tz), *hour, 0, &tz),
        }
    }
}

// ── Options ─────────────────────────────────────────────────────────────────

/// Resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    /// Timezone whose calendar defines "today" and in which naive
    /// date-times are read.
    pub timezone: Tz,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

impl WindowOptions {
    /// Options for an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTimezone`] for an unknown name.
    pub fn with_timezone(name: &str) -> Result<Self> {
        Ok(Self {
            timezone: parse_timezone(name)?,
        })
    }
}

/// Which inputs explicit mode accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplicitPolicy {
    /// `"HH:mm"` on today's date, or a full date-time string.
    #[default]
    ClockOrAbsolute,
    /// Full date-time strings only.
    AbsoluteOnly,
}

/// How the two ends of a window are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Both ends are hours of day; the end rolls over midnight when needed.
    HourPair,
    /// Both ends are strings, resolved under the given policy.
    Explicit(ExplicitPolicy),
}

// ── ResolvedWindow ──────────────────────────────────────────────────────────

/// A validated `(start, end)` pair with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct ResolvedWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WindowBounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<WindowBounds> for ResolvedWindow {
    type Error = ScheduleError;

    fn try_from(bounds: WindowBounds) -> Result<Self> {
        ResolvedWindow::new(bounds.start, bounds.end)
    }
}

impl ResolvedWindow {
    /// Build a window.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidWindow`] unless `end` is strictly after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(ScheduleError::InvalidWindow(format!(
                "end {} must be after start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Length in whole minutes, rounded half up.
    pub fn duration_minutes(&self) -> i64 {
        (self.duration().num_milliseconds() + 30_000) / 60_000
    }

    /// Whether `instant` falls inside the window, both ends included.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

// ── resolve_clock_or_absolute / resolve_absolute ────────────────────────────

/// Resolve one time value: an hour number or `"HH:mm"` string lands on
/// today's date, anything else must be a full date-time.
///
/// # Errors
///
/// - [`ScheduleError::InvalidFormat`] — a clock string without exactly two
///   integer parts, or an unparseable date-time (`"12"`).
/// - [`ScheduleError::OutOfRange`] — hour outside 0–23 or minute outside 0–59
///   (`"25:00"`, `"12:61"`), or a non-integral hour number.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Timelike, Utc};
/// use taskwindow::window::{resolve_clock_or_absolute, TimeInput, WindowOptions};
///
/// let anchor = Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
/// let at = resolve_clock_or_absolute(anchor, &TimeInput::text("09:15"), &WindowOptions::default())
///     .unwrap();
/// assert_eq!((at.hour(), at.minute()), (9, 15));
/// ```
pub fn resolve_clock_or_absolute(
    anchor: DateTime<Utc>,
    input: &TimeInput,
    options: &WindowOptions,
) -> Result<DateTime<Utc>> {
    TimeSpec::parse(input)?.resolve(anchor, options)
}

/// Resolve a full date-time string. Clock strings and numbers are rejected.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidFormat`] for anything that does not parse
/// as RFC 3339, RFC 2822, a naive `YYYY-MM-DD[ T]HH:MM[:SS]`, or a bare
/// `YYYY-MM-DD` date.
pub fn resolve_absolute(input: &TimeInput, options: &WindowOptions) -> Result<DateTime<Utc>> {
    match input {
        TimeInput::Text(s) => parse_absolute(s, &options.timezone),
        TimeInput::Number(n) => Err(ScheduleError::InvalidFormat(format!(
            "expected a date-time string, got number {n}"
        ))),
    }
}

// ── resolve_window ──────────────────────────────────────────────────────────

/// Resolve a window from two hours of day.
///
/// The start lands on today's date. The end lands on today's date when
/// `end_hour > start_hour` and on tomorrow's otherwise.
///
/// # Errors
///
/// Returns [`ScheduleError::OutOfRange`] (attributed to `start` or `end`)
/// for an hour above 23.
pub fn resolve_hour_pair(
    anchor: DateTime<Utc>,
    start_hour: u32,
    end_hour: u32,
    options: &WindowOptions,
) -> Result<ResolvedWindow> {
    check_hour(start_hour).map_err(|e| e.at("start"))?;
    check_hour(end_hour).map_err(|e| e.at("end"))?;

    let tz = options.timezone;
    let today = local_today(anchor, &tz);
    // A start hour skipped by spring-forward is read before the gap so it
    // stays ahead of an end hour that lands just after it.
    let start = at_local_with(today, start_hour, 0, &tz, Gap::Before)?;

    let end_date = if end_hour <= start_hour {
        debug!(start_hour, end_hour, "end hour not after start hour, rolling end to next day");
        today
            .succ_opt()
            .ok_or_else(|| ScheduleError::OutOfRange(format!("no day after {today}")))?
    } else {
        today
    };
    let end = at_local(end_date, end_hour, 0, &tz)?;

    ResolvedWindow::new(start, end)
}

/// Resolve a window from two raw inputs.
///
/// In [`WindowMode::HourPair`] both inputs must be hour numbers and the
/// rollover rule of [`resolve_hour_pair`] applies. In
/// [`WindowMode::Explicit`] both must be strings accepted by the policy.
/// Either way the result satisfies `end > start`.
///
/// # Errors
///
/// The first violated rule, checking the start before the end:
/// [`ScheduleError::InvalidFormat`] or [`ScheduleError::OutOfRange`]
/// attributed to `start` / `end`, then [`ScheduleError::InvalidWindow`].
pub fn resolve_window(
    anchor: DateTime<Utc>,
    start: &TimeInput,
    end: &TimeInput,
    mode: WindowMode,
    options: &WindowOptions,
) -> Result<ResolvedWindow> {
    match mode {
        WindowMode::HourPair => {
            let start_hour = parse_hour(start).map_err(|e| e.at("start"))?;
            let end_hour = parse_hour(end).map_err(|e| e.at("end"))?;
            resolve_hour_pair(anchor, start_hour, end_hour, options)
        }
        WindowMode::Explicit(policy) => {
            let start_at =
                resolve_explicit(anchor, start, policy, options).map_err(|e| e.at("start"))?;
            let end_at =
                resolve_explicit(anchor, end, policy, options).map_err(|e| e.at("end"))?;
            ResolvedWindow::new(start_at, end_at)
        }
    }
}

fn resolve_explicit(
    anchor: DateTime<Utc>,
    input: &TimeInput,
    policy: ExplicitPolicy,
    options: &WindowOptions,
) -> Result<DateTime<Utc>> {
    match (policy, input) {
        (ExplicitPolicy::ClockOrAbsolute, TimeInput::Number(n)) => {
            Err(ScheduleError::InvalidFormat(format!(
                "hour number {n} is only accepted for hour pairs; use \"HH:mm\""
            )))
        }
        (ExplicitPolicy::ClockOrAbsolute, _) => resolve_clock_or_absolute(anchor, input, options),
        (ExplicitPolicy::AbsoluteOnly, _) => resolve_absolute(input, options),
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(format!("'{s}'")))
}

/// Parse `"HH:mm"`.
fn parse_clock(s: &str) -> Result<TimeSpec> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(ScheduleError::InvalidFormat(format!(
            "expected HH:mm, got '{s}'"
        )));
    }

    let hour = parse_clock_part(parts[0], s)?;
    let minute = parse_clock_part(parts[1], s)?;

    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) {
        return Err(ScheduleError::OutOfRange(format!(
            "hour must be 0-23 and minute 0-59, got '{s}'"
        )));
    }

    Ok(TimeSpec::ClockTime {
        hour: hour as u32,
        minute: minute as u32,
    })
}

fn parse_clock_part(part: &str, whole: &str) -> Result<i64> {
    part.trim()
        .parse::<i64>()
        .map_err(|_| ScheduleError::InvalidFormat(format!("expected HH:mm, got '{whole}'")))
}

/// An hour-of-day number, 0–23. Integral floats such as `9.0` count.
fn hour_of_day(n: &serde_json::Number) -> Result<u32> {
    let hour = match n.as_i64() {
        Some(h) => Some(h),
        None => n
            .as_f64()
            .filter(|h| h.fract() == 0.0 && (0.0..=23.0).contains(h))
            .map(|h| h as i64),
    };
    match hour {
        Some(h) if (0..=23).contains(&h) => Ok(h as u32),
        _ => Err(ScheduleError::OutOfRange(format!(
            "hour must be an integer between 0 and 23, got {n}"
        ))),
    }
}

/// Read an hour-of-day number (0–23) from a raw input.
///
/// # Errors
///
/// [`ScheduleError::InvalidFormat`] for a string, [`ScheduleError::OutOfRange`]
/// for a number that is not an integer in 0–23.
pub fn parse_hour(input: &TimeInput) -> Result<u32> {
    match input {
        TimeInput::Number(n) => hour_of_day(n),
        TimeInput::Text(s) => Err(ScheduleError::InvalidFormat(format!(
            "expected an hour-of-day number, got '{s}'"
        ))),
    }
}

fn check_hour(hour: u32) -> Result<()> {
    if hour > 23 {
        return Err(ScheduleError::OutOfRange(format!(
            "hour must be between 0 and 23, got {hour}"
        )));
    }
    Ok(())
}

/// Parse a full date-time string. Naive forms are read in `tz`.
fn parse_absolute(s: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ScheduleError::InvalidFormat("empty date-time".to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            debug!(input = s, format, "parsed naive date-time");
            return Ok(localize(&naive, tz));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ScheduleError::InvalidFormat(format!("'{s}'")))?;
        return Ok(localize(&midnight, tz));
    }

    Err(ScheduleError::InvalidFormat(format!(
        "cannot parse date-time: '{s}'"
    )))
}

/// The anchor's calendar date in `tz`.
fn local_today(anchor: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    anchor.with_timezone(tz).date_naive()
}

/// Where a local time skipped by a DST gap is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gap {
    /// Read with the offset in force after the gap: lands before the transition.
    Before,
    /// Read with the offset in force before the gap: lands after the transition.
    After,
}

/// `date` at `hour:minute:00.000` local time.
fn at_local(date: NaiveDate, hour: u32, minute: u32, tz: &Tz) -> Result<DateTime<Utc>> {
    at_local_with(date, hour, minute, tz, Gap::After)
}

fn at_local_with(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    tz: &Tz,
    gap: Gap,
) -> Result<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        ScheduleError::OutOfRange(format!("no such time of day: {hour:02}:{minute:02}"))
    })?;
    Ok(localize_with(&date.and_time(time), tz, gap))
}

/// Map a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are read with the offset in force before the gap, which moves
/// them forward by the gap length.
fn localize(naive: &NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    localize_with(naive, tz, Gap::After)
}

fn localize_with(naive: &NaiveDateTime, tz: &Tz, gap: Gap) -> DateTime<Utc> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let reference = match gap {
                Gap::After => *naive - chrono::Duration::days(1),
                Gap::Before => *naive + chrono::Duration::days(1),
            };
            let offset_secs = tz.offset_from_utc_datetime(&reference).fix().local_minus_utc();
            let utc = *naive - chrono::Duration::seconds(i64::from(offset_secs));
            debug!(local = %naive, timezone = %tz, ?gap, "local time falls in a DST gap");
            Utc.from_utc_datetime(&utc)
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::{Datelike, Timelike};

    /// Wednesday, February 18, 2026 at 14:30 UTC.
    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap()
    }

    fn utc() -> WindowOptions {
        WindowOptions::default()
    }

    fn new_york() -> WindowOptions {
        WindowOptions::with_timezone("America/New_York").unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    // ── TimeSpec::parse tests ───────────────────────────────────────────

    #[test]
    fn test_parse_number_is_hour() {
        assert_eq!(
            TimeSpec::parse(&TimeInput::hour(7)).unwrap(),
            TimeSpec::Hour(7)
        );
    }

    #[test]
    fn test_parse_hour_accepts_integral_float() {
        let nine: TimeInput = serde_json::from_str("9.0").unwrap();
        assert_eq!(parse_hour(&nine).unwrap(), 9);

        let half: TimeInput = serde_json::from_str("6.5").unwrap();
        assert_eq!(parse_hour(&half).unwrap_err().kind(), ErrorKind::OutOfRange);

        let too_big: TimeInput = serde_json::from_str("24.0").unwrap();
        assert_eq!(parse_hour(&too_big).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_parse_colon_string_is_clock_time() {
        assert_eq!(
            TimeSpec::parse(&TimeInput::text("08:45")).unwrap(),
            TimeSpec::ClockTime {
                hour: 8,
                minute: 45
            }
        );
    }

    #[test]
    fn test_parse_plain_string_is_absolute() {
        assert_eq!(
            TimeSpec::parse(&TimeInput::text("2026-03-01")).unwrap(),
            TimeSpec::Absolute("2026-03-01".to_string())
        );
    }

    #[test]
    fn test_parse_clock_tolerates_single_digits_and_spaces() {
        assert_eq!(
            TimeSpec::parse(&TimeInput::text(" 9: 5")).unwrap(),
            TimeSpec::ClockTime { hour: 9, minute: 5 }
        );
    }

    #[test]
    fn test_time_input_deserializes_untagged() {
        let n: TimeInput = serde_json::from_str("22").unwrap();
        assert_eq!(n, TimeInput::hour(22));
        let s: TimeInput = serde_json::from_str("\"22:00\"").unwrap();
        assert_eq!(s, TimeInput::text("22:00"));
    }

    // ── resolve_clock_or_absolute tests ─────────────────────────────────

    #[test]
    fn test_clock_string_lands_on_today() {
        let result = resolve_clock_or_absolute(anchor(), &"09:15".into(), &utc()).unwrap();
        assert_eq!(result, at(2026, 2, 18, 9, 15));
        assert_eq!(result.second(), 0);
        assert_eq!(result.nanosecond(), 0);
    }

    #[test]
    fn test_clock_string_before_now_still_today() {
        // 01:00 is earlier than the 14:30 anchor; no forward shift is applied
        let result = resolve_clock_or_absolute(anchor(), &"01:00".into(), &utc()).unwrap();
        assert_eq!(result, at(2026, 2, 18, 1, 0));
    }

    #[test]
    fn test_clock_hour_out_of_range() {
        let err = resolve_clock_or_absolute(anchor(), &"25:00".into(), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_clock_minute_out_of_range() {
        let err = resolve_clock_or_absolute(anchor(), &"12:61".into(), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_clock_negative_hour_out_of_range() {
        let err = resolve_clock_or_absolute(anchor(), &"-1:00".into(), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_clock_three_parts_invalid_format() {
        let err = resolve_clock_or_absolute(anchor(), &"12:00:00".into(), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_clock_non_numeric_invalid_format() {
        for input in ["ab:cd", "12:", ":30", "9.5:00"] {
            let err = resolve_clock_or_absolute(anchor(), &input.into(), &utc()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat, "input: {input}");
        }
    }

    #[test]
    fn test_iso_timestamp_with_colon_is_read_as_clock() {
        // A colon always selects clock parsing under this converter
        let err = resolve_clock_or_absolute(anchor(), &"2026-03-15T14:00:00Z".into(), &utc())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_bare_number_string_invalid_format() {
        let err = resolve_clock_or_absolute(anchor(), &"12".into(), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_date_only_string_resolves() {
        let result = resolve_clock_or_absolute(anchor(), &"2026-03-01".into(), &utc()).unwrap();
        assert_eq!(result, at(2026, 3, 1, 0, 0));
    }

    #[test]
    fn test_hour_number_lands_on_today() {
        let result = resolve_clock_or_absolute(anchor(), &TimeInput::hour(17), &utc()).unwrap();
        assert_eq!(result, at(2026, 2, 18, 17, 0));
    }

    #[test]
    fn test_hour_number_out_of_range() {
        let err = resolve_clock_or_absolute(anchor(), &TimeInput::hour(24), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_fractional_hour_out_of_range() {
        let input: TimeInput = serde_json::from_str("9.5").unwrap();
        let err = resolve_clock_or_absolute(anchor(), &input, &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_today_follows_configured_timezone() {
        // 03:00 UTC on Feb 18 is still Feb 17 in New York (EST, UTC-5)
        let early = at(2026, 2, 18, 3, 0);
        let result = resolve_clock_or_absolute(early, &"09:00".into(), &new_york()).unwrap();
        assert_eq!(result, at(2026, 2, 17, 14, 0));
    }

    // ── resolve_absolute tests ──────────────────────────────────────────

    #[test]
    fn test_absolute_rfc3339() {
        let result = resolve_absolute(&"2026-03-15T14:00:00+02:00".into(), &utc()).unwrap();
        assert_eq!(result, at(2026, 3, 15, 12, 0));
    }

    #[test]
    fn test_absolute_rfc2822() {
        let result = resolve_absolute(&"Sun, 15 Mar 2026 14:00:00 +0000".into(), &utc()).unwrap();
        assert_eq!(result, at(2026, 3, 15, 14, 0));
    }

    #[test]
    fn test_absolute_naive_read_in_timezone() {
        let result = resolve_absolute(&"2026-01-15T09:30".into(), &new_york()).unwrap();
        assert_eq!(result, at(2026, 1, 15, 14, 30));
        let spaced = resolve_absolute(&"2026-01-15 09:30:00".into(), &new_york()).unwrap();
        assert_eq!(spaced, result);
    }

    #[test]
    fn test_absolute_fractional_seconds() {
        let result = resolve_absolute(&"2026-01-15T09:30:00.250".into(), &utc()).unwrap();
        assert_eq!(result.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_absolute_rejects_clock_string() {
        let err = resolve_absolute(&"09:00".into(), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_absolute_rejects_number() {
        let err = resolve_absolute(&TimeInput::hour(9), &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_absolute_rejects_garbage() {
        for input in ["", "   ", "tomorrow", "2026-13-01", "2026-02-30"] {
            let err = resolve_absolute(&input.into(), &utc()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat, "input: {input:?}");
        }
    }

    // ── resolve_hour_pair tests ─────────────────────────────────────────

    #[test]
    fn test_hour_pair_same_day() {
        let window = resolve_hour_pair(anchor(), 9, 17, &utc()).unwrap();
        assert_eq!(window.start(), at(2026, 2, 18, 9, 0));
        assert_eq!(window.end(), at(2026, 2, 18, 17, 0));
        assert_eq!(window.duration(), chrono::Duration::hours(8));
    }

    #[test]
    fn test_hour_pair_overnight() {
        let window = resolve_hour_pair(anchor(), 22, 6, &utc()).unwrap();
        assert_eq!(window.start(), at(2026, 2, 18, 22, 0));
        assert_eq!(window.end(), at(2026, 2, 19, 6, 0));
        assert_eq!(window.duration(), chrono::Duration::hours(8));
    }

    #[test]
    fn test_hour_pair_equal_hours_roll_over() {
        let window = resolve_hour_pair(anchor(), 9, 9, &utc()).unwrap();
        assert_eq!(window.end().day(), window.start().day() + 1);
        assert_eq!(window.duration(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_hour_pair_month_boundary() {
        let last_of_month = at(2026, 2, 28, 12, 0);
        let window = resolve_hour_pair(last_of_month, 23, 1, &utc()).unwrap();
        assert_eq!(window.end(), at(2026, 3, 1, 1, 0));
    }

    #[test]
    fn test_hour_pair_out_of_range_names_field() {
        let err = resolve_hour_pair(anchor(), 9, 24, &utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.field(), Some("end"));
    }

    #[test]
    fn test_hour_pair_in_timezone() {
        // Local date in New York is Feb 17; 22:00 EST → 03:00Z, 06:00 EST next day → 11:00Z
        let early = at(2026, 2, 18, 3, 0);
        let window = resolve_hour_pair(early, 22, 6, &new_york()).unwrap();
        assert_eq!(window.start(), at(2026, 2, 18, 3, 0));
        assert_eq!(window.end(), at(2026, 2, 18, 11, 0));
    }

    #[test]
    fn test_hour_pair_rollover_across_dst_keeps_wall_clock() {
        // March 7 → 8, 2026: US spring forward; 22:00 EST to 06:00 EDT is 7 real hours
        let day_before = at(2026, 3, 7, 17, 0);
        let window = resolve_hour_pair(day_before, 22, 6, &new_york()).unwrap();
        assert_eq!(window.start(), at(2026, 3, 8, 3, 0));
        assert_eq!(window.end(), at(2026, 3, 8, 10, 0));
        assert_eq!(window.duration(), chrono::Duration::hours(7));
    }

    #[test]
    fn test_hour_pair_start_in_dst_gap_stays_before_end() {
        // 02:00 is skipped on March 8, 2026; start lands just before the jump (06:00Z)
        let dst_day = at(2026, 3, 8, 12, 0);
        let window = resolve_hour_pair(dst_day, 2, 3, &new_york()).unwrap();
        assert_eq!(window.start(), at(2026, 3, 8, 6, 0));
        assert_eq!(window.end(), at(2026, 3, 8, 7, 0));
        assert!(window.end() > window.start());
    }

    #[test]
    fn test_hour_pair_end_in_dst_gap_shifts_forward() {
        let dst_day = at(2026, 3, 8, 12, 0);
        let window = resolve_hour_pair(dst_day, 1, 2, &new_york()).unwrap();
        assert_eq!(window.start(), at(2026, 3, 8, 6, 0));
        assert_eq!(window.end(), at(2026, 3, 8, 7, 0));
    }

    // ── DST local-time edge cases ───────────────────────────────────────

    #[test]
    fn test_clock_in_dst_gap_shifts_forward() {
        // 02:30 does not exist on March 8, 2026 in New York; read as 02:30 EST = 03:30 EDT
        let dst_day = at(2026, 3, 8, 12, 0);
        let result = resolve_clock_or_absolute(dst_day, &"02:30".into(), &new_york()).unwrap();
        assert_eq!(result, at(2026, 3, 8, 7, 30));
    }

    #[test]
    fn test_clock_in_dst_overlap_takes_earlier() {
        // 01:30 happens twice on November 1, 2026 in New York; the EDT one is earlier
        let fall_back = at(2026, 11, 1, 12, 0);
        let result = resolve_clock_or_absolute(fall_back, &"01:30".into(), &new_york()).unwrap();
        assert_eq!(result, at(2026, 11, 1, 5, 30));
    }

    // ── resolve_window tests ────────────────────────────────────────────

    #[test]
    fn test_window_hour_pair_mode() {
        let window = resolve_window(
            anchor(),
            &TimeInput::hour(22),
            &TimeInput::hour(6),
            WindowMode::HourPair,
            &utc(),
        )
        .unwrap();
        assert_eq!(window.end(), at(2026, 2, 19, 6, 0));
    }

    #[test]
    fn test_window_hour_pair_rejects_strings() {
        let err = resolve_window(
            anchor(),
            &"09:00".into(),
            &TimeInput::hour(6),
            WindowMode::HourPair,
            &utc(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(err.field(), Some("start"));
    }

    #[test]
    fn test_window_explicit_clock_strings() {
        let window = resolve_window(
            anchor(),
            &"09:00".into(),
            &"10:30".into(),
            WindowMode::Explicit(ExplicitPolicy::ClockOrAbsolute),
            &utc(),
        )
        .unwrap();
        assert_eq!(window.start(), at(2026, 2, 18, 9, 0));
        assert_eq!(window.duration_minutes(), 90);
    }

    #[test]
    fn test_window_explicit_clock_does_not_roll_over() {
        let err = resolve_window(
            anchor(),
            &"22:00".into(),
            &"06:00".into(),
            WindowMode::Explicit(ExplicitPolicy::ClockOrAbsolute),
            &utc(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWindow);
    }

    #[test]
    fn test_window_explicit_equal_is_invalid() {
        let err = resolve_window(
            anchor(),
            &"2026-03-01T09:00:00Z".into(),
            &"2026-03-01T09:00:00Z".into(),
            WindowMode::Explicit(ExplicitPolicy::AbsoluteOnly),
            &utc(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWindow);
    }

    #[test]
    fn test_window_explicit_mixed_clock_and_date() {
        let window = resolve_window(
            anchor(),
            &"23:00".into(),
            &"2026-02-19".into(),
            WindowMode::Explicit(ExplicitPolicy::ClockOrAbsolute),
            &utc(),
        )
        .unwrap();
        assert_eq!(window.duration_minutes(), 60);
    }

    #[test]
    fn test_window_clock_policy_rejects_numbers() {
        let err = resolve_window(
            anchor(),
            &"09:00".into(),
            &TimeInput::hour(17),
            WindowMode::Explicit(ExplicitPolicy::ClockOrAbsolute),
            &utc(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(err.field(), Some("end"));
    }

    #[test]
    fn test_window_absolute_policy_rejects_clock() {
        let err = resolve_window(
            anchor(),
            &"09:00".into(),
            &"2026-03-01T10:00:00Z".into(),
            WindowMode::Explicit(ExplicitPolicy::AbsoluteOnly),
            &utc(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(err.field(), Some("start"));
    }

    #[test]
    fn test_window_reports_start_before_end() {
        let err = resolve_window(
            anchor(),
            &"99:00".into(),
            &"nonsense".into(),
            WindowMode::Explicit(ExplicitPolicy::ClockOrAbsolute),
            &utc(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("start"));
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    // ── ResolvedWindow tests ────────────────────────────────────────────

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = resolve_hour_pair(anchor(), 9, 17, &utc()).unwrap();
        assert!(window.contains(window.start()));
        assert!(window.contains(window.end()));
        assert!(window.contains(anchor()));
        assert!(!window.contains(at(2026, 2, 18, 8, 59)));
    }

    #[test]
    fn test_duration_minutes_rounds_half_up() {
        let start = at(2026, 2, 18, 9, 0);
        let window =
            ResolvedWindow::new(start, start + chrono::Duration::seconds(90)).unwrap();
        assert_eq!(window.duration_minutes(), 2);
        let window =
            ResolvedWindow::new(start, start + chrono::Duration::seconds(89)).unwrap();
        assert_eq!(window.duration_minutes(), 1);
    }

    #[test]
    fn test_window_serde_enforces_order() {
        let window = resolve_hour_pair(anchor(), 9, 17, &utc()).unwrap();
        let json = serde_json::to_string(&window).unwrap();
        let back: ResolvedWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, window);

        let reversed = r#"{"start":"2026-02-18T17:00:00Z","end":"2026-02-18T09:00:00Z"}"#;
        assert!(serde_json::from_str::<ResolvedWindow>(reversed).is_err());
    }

    #[test]
    fn test_invalid_timezone() {
        let err = WindowOptions::with_timezone("Mars/Olympus").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTimezone);
    }
}
