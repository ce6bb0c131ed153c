//! Task, routine and reminder records.
//!
//! Request DTOs deserialize straight from JSON bodies and are turned into
//! typed records by their `validate` / `apply` methods. Validation stops at
//! the first violated rule. Storing the records is the caller's business.
//!
//! Window policies per record:
//!
//! | record | window inputs |
//! |--------|---------------|
//! | [`Task`] | `"HH:mm"` or date-time strings |
//! | [`Routine`] | both `hours_start`/`hours_end` (overnight rollover), else date-time strings |
//! | [`Reminder`] | `"HH:mm"` or date-time strings |
//!
//! [`RecurringPattern`] and [`ActivityLog`] carry no window.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::window::{
    parse_hour, resolve_absolute, resolve_window, ExplicitPolicy, ResolvedWindow, TimeInput,
    WindowMode, WindowOptions,
};

// ── Enumerations ────────────────────────────────────────────────────────────

/// A closed set of wire names.
trait Choice: Copy + 'static {
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

fn parse_choice<T: Choice>(s: &str) -> Result<T> {
    T::ALL
        .iter()
        .copied()
        .find(|choice| choice.as_str() == s)
        .ok_or_else(|| {
            let allowed: Vec<&str> = T::ALL.iter().map(|c| c.as_str()).collect();
            ScheduleError::InvalidValue(format!(
                "{} must be one of {}, got '{s}'",
                T::FIELD,
                allowed.join(", ")
            ))
        })
}

/// Parse an optional enum field, falling back to the type's default.
/// A blank string counts as absent.
fn choice_or_default<T: Choice + Default>(value: Option<&str>) -> Result<T> {
    match value.filter(|s| !s.trim().is_empty()) {
        Some(s) => parse_choice(s).map_err(|e| e.at(T::FIELD)),
        None => Ok(T::default()),
    }
}

macro_rules! choice_impls {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = ScheduleError;

            fn from_str(s: &str) -> Result<Self> {
                parse_choice(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Choice for Priority {
    const FIELD: &'static str = "priority";
    const ALL: &'static [Self] = &[Priority::Low, Priority::Medium, Priority::High];

    fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

choice_impls!(Priority);

/// Progress of a task or routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Choice for ActivityStatus {
    const FIELD: &'static str = "status";
    const ALL: &'static [Self] = &[
        ActivityStatus::Pending,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
        ActivityStatus::Cancelled,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Pending => "pending",
            ActivityStatus::InProgress => "in-progress",
            ActivityStatus::Completed => "completed",
            ActivityStatus::Cancelled => "cancelled",
        }
    }
}

choice_impls!(ActivityStatus);

/// Delivery state of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Sent,
    Cancelled,
}

impl Choice for ReminderStatus {
    const FIELD: &'static str = "status";
    const ALL: &'static [Self] = &[
        ReminderStatus::Pending,
        ReminderStatus::Sent,
        ReminderStatus::Cancelled,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Cancelled => "cancelled",
        }
    }
}

choice_impls!(ReminderStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl Choice for RecurrenceKind {
    const FIELD: &'static str = "pattern";
    const ALL: &'static [Self] = &[
        RecurrenceKind::Daily,
        RecurrenceKind::Weekly,
        RecurrenceKind::Monthly,
        RecurrenceKind::Yearly,
        RecurrenceKind::Custom,
    ];

    fn as_str(self) -> &'static str {
        match self {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Yearly => "yearly",
            RecurrenceKind::Custom => "custom",
        }
    }
}

choice_impls!(RecurrenceKind);

/// How often a task, routine or reminder repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPattern {
    pub pattern: RecurrenceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecurringPattern {
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidValue`] for an unknown pattern name.
    pub fn new(pattern: &str, description: Option<&str>) -> Result<Self> {
        Ok(Self {
            pattern: parse_choice(pattern).map_err(|e| e.at("pattern"))?,
            description: clean_description(description.map(str::to_string)),
        })
    }
}

/// An audit entry for something a user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ActivityLog {
    /// `action` is required and trimmed; blank `details` become absent.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::MissingField`] for a missing or blank action.
    pub fn new(action: &str, details: Option<&str>) -> Result<Self> {
        let action = action.trim();
        if action.is_empty() {
            return Err(ScheduleError::MissingField("action".to_string()));
        }
        Ok(Self {
            action: action.to_string(),
            details: clean_description(details.map(str::to_string)),
        })
    }
}

// ── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub window: ResolvedWindow,
    pub priority: Priority,
    pub status: ActivityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub window: ResolvedWindow,
    pub priority: Priority,
    pub status: ActivityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern_id: Option<String>,
}

impl Routine {
    pub fn duration_minutes(&self) -> i64 {
        self.window.duration_minutes()
    }

    /// In progress and `now` inside the window.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == ActivityStatus::InProgress && self.window.contains(now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub window: ResolvedWindow,
    pub priority: Priority,
    pub status: ReminderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern_id: Option<String>,
}

// ── Requests ────────────────────────────────────────────────────────────────

/// Body of a create-task request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<TimeInput>,
    pub end_time: Option<TimeInput>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub routine_id: Option<String>,
    pub recurring_pattern_id: Option<String>,
}

impl TaskRequest {
    /// Validate into a [`Task`].
    ///
    /// `title`, `start_time` and `end_time` are required; times are
    /// `"HH:mm"` (today) or date-time strings. Priority defaults to
    /// `medium`, status to `pending`.
    ///
    /// # Errors
    ///
    /// The first of: [`ScheduleError::MissingField`], a window error
    /// attributed to `start_time` / `end_time`, [`ScheduleError::InvalidValue`]
    /// for `priority` / `status`.
    pub fn validate(self, anchor: DateTime<Utc>, options: &WindowOptions) -> Result<Task> {
        let title = require_title(self.title.as_deref())?;
        let start = require_time(self.start_time.as_ref(), "start_time")?;
        let end = require_time(self.end_time.as_ref(), "end_time")?;

        let window = explicit_window(anchor, start, end, ExplicitPolicy::ClockOrAbsolute, options)?;
        let priority = choice_or_default(self.priority.as_deref())?;
        let status = choice_or_default(self.status.as_deref())?;

        debug!(%title, start = %window.start(), end = %window.end(), "validated task");
        Ok(Task {
            title,
            description: clean_description(self.description),
            window,
            priority,
            status,
            routine_id: self.routine_id,
            recurring_pattern_id: self.recurring_pattern_id,
        })
    }
}

/// Body of a create-routine request.
///
/// Either both `hours_start` and `hours_end` (hours of day, rolling over
/// midnight) or both `start_time` and `end_time` (date-time strings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<TimeInput>,
    pub end_time: Option<TimeInput>,
    pub hours_start: Option<TimeInput>,
    pub hours_end: Option<TimeInput>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub recurring_pattern_id: Option<String>,
}

impl RoutineRequest {
    /// Validate into a [`Routine`].
    ///
    /// # Errors
    ///
    /// The first of: [`ScheduleError::MissingField`] (title, or neither form
    /// of an end), [`ScheduleError::OutOfRange`] for an hour field,
    /// a window error, [`ScheduleError::InvalidValue`] for `priority` /
    /// `status`.
    pub fn validate(self, anchor: DateTime<Utc>, options: &WindowOptions) -> Result<Routine> {
        let title = require_title(self.title.as_deref())?;

        let start_time = given(self.start_time.as_ref());
        let end_time = given(self.end_time.as_ref());
        if start_time.is_none() && self.hours_start.is_none() {
            return Err(ScheduleError::MissingField(
                "start_time or hours_start".to_string(),
            ));
        }
        if end_time.is_none() && self.hours_end.is_none() {
            return Err(ScheduleError::MissingField(
                "end_time or hours_end".to_string(),
            ));
        }

        if let Some(hours) = &self.hours_start {
            parse_hour(hours).map_err(|e| e.at("hours_start"))?;
        }
        if let Some(hours) = &self.hours_end {
            parse_hour(hours).map_err(|e| e.at("hours_end"))?;
        }

        let window = match (&self.hours_start, &self.hours_end) {
            (Some(hours_start), Some(hours_end)) => {
                resolve_window(anchor, hours_start, hours_end, WindowMode::HourPair, options)
                    .map_err(|e| e.renamed("start", "hours_start").renamed("end", "hours_end"))?
            }
            _ => {
                let start = require_time(start_time, "start_time")?;
                let end = require_time(end_time, "end_time")?;
                explicit_window(anchor, start, end, ExplicitPolicy::AbsoluteOnly, options)?
            }
        };

        let priority = choice_or_default(self.priority.as_deref())?;
        let status = choice_or_default(self.status.as_deref())?;

        debug!(%title, start = %window.start(), end = %window.end(), "validated routine");
        Ok(Routine {
            title,
            description: clean_description(self.description),
            window,
            priority,
            status,
            recurring_pattern_id: self.recurring_pattern_id,
        })
    }
}

/// Body of an update-routine request. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutinePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<TimeInput>,
    pub end_time: Option<TimeInput>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub recurring_pattern_id: Option<String>,
}

impl RoutinePatch {
    /// Merge into `existing`, returning the updated routine.
    ///
    /// A given `start_time` / `end_time` must be a date-time string; the
    /// other end is kept, and the merged window must still have
    /// `end > start`.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidFormat`] for a bad time,
    /// [`ScheduleError::InvalidWindow`] for a merged window out of order,
    /// [`ScheduleError::MissingField`] for a blank title,
    /// [`ScheduleError::InvalidValue`] for `priority` / `status`.
    pub fn apply(self, existing: &Routine, options: &WindowOptions) -> Result<Routine> {
        let new_start = given(self.start_time.as_ref())
            .map(|input| resolve_absolute(input, options).map_err(|e| e.at("start_time")))
            .transpose()?;
        let new_end = given(self.end_time.as_ref())
            .map(|input| resolve_absolute(input, options).map_err(|e| e.at("end_time")))
            .transpose()?;
        // Blame the end unless only the start moved.
        let moved = if new_start.is_some() && new_end.is_none() {
            "start_time"
        } else {
            "end_time"
        };
        let window = ResolvedWindow::new(
            new_start.unwrap_or_else(|| existing.window.start()),
            new_end.unwrap_or_else(|| existing.window.end()),
        )
        .map_err(|e| e.at(moved))?;

        let title = match self.title.as_deref() {
            Some(title) => require_title(Some(title))?,
            None => existing.title.clone(),
        };
        let description = match self.description {
            Some(description) => clean_description(Some(description)),
            None => existing.description.clone(),
        };
        let priority = match self.priority.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => parse_choice(s).map_err(|e| e.at("priority"))?,
            None => existing.priority,
        };
        let status = match self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => parse_choice(s).map_err(|e| e.at("status"))?,
            None => existing.status,
        };

        Ok(Routine {
            title,
            description,
            window,
            priority,
            status,
            recurring_pattern_id: self
                .recurring_pattern_id
                .or_else(|| existing.recurring_pattern_id.clone()),
        })
    }
}

/// Body of a create-reminder request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<TimeInput>,
    pub end_time: Option<TimeInput>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub task_id: Option<String>,
    pub routine_id: Option<String>,
    pub recurring_pattern_id: Option<String>,
}

impl ReminderRequest {
    /// Validate into a [`Reminder`]. Same rules as [`TaskRequest::validate`],
    /// with [`ReminderStatus`] for the status.
    pub fn validate(self, anchor: DateTime<Utc>, options: &WindowOptions) -> Result<Reminder> {
        let title = require_title(self.title.as_deref())?;
        let start = require_time(self.start_time.as_ref(), "start_time")?;
        let end = require_time(self.end_time.as_ref(), "end_time")?;

        let window = explicit_window(anchor, start, end, ExplicitPolicy::ClockOrAbsolute, options)?;
        let priority = choice_or_default(self.priority.as_deref())?;
        let status = choice_or_default(self.status.as_deref())?;

        Ok(Reminder {
            title,
            description: clean_description(self.description),
            window,
            priority,
            status,
            task_id: self.task_id,
            routine_id: self.routine_id,
            recurring_pattern_id: self.recurring_pattern_id,
        })
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn require_title(title: Option<&str>) -> Result<String> {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(ScheduleError::MissingField("title".to_string())),
    }
}

/// `None` for an absent or blank input.
fn given(input: Option<&TimeInput>) -> Option<&TimeInput> {
    input.filter(|input| !input.is_blank())
}

fn require_time<'a>(input: Option<&'a TimeInput>, field: &str) -> Result<&'a TimeInput> {
    given(input).ok_or_else(|| ScheduleError::MissingField(field.to_string()))
}

fn explicit_window(
    anchor: DateTime<Utc>,
    start: &TimeInput,
    end: &TimeInput,
    policy: ExplicitPolicy,
    options: &WindowOptions,
) -> Result<ResolvedWindow> {
    resolve_window(anchor, start, end, WindowMode::Explicit(policy), options)
        .map_err(|e| e.renamed("start", "start_time").renamed("end", "end_time"))
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

// ── Tests ───────────────────────────────────────────────────────────────────
