//! # taskwindow
//!
//! Time-window resolution and record validation for task and routine
//! scheduling.
//!
//! Request bodies describe when an activity happens in loose terms: an
//! hour of day (`22`), a clock time (`"22:00"`), or a full date-time
//! (`"2026-03-15T22:00:00Z"`). This crate turns those into a validated
//! `(start, end)` pair of UTC instants, rolling overnight hour pairs into
//! the next day, and validates the task/routine/reminder records built
//! around them.
//!
//! ## Modules
//!
//! - [`window`] — `TimeSpec` resolution, hour-pair rollover, `ResolvedWindow`
//! - [`clock`] — injectable "now" (`SystemClock`, `FixedClock`)
//! - [`format`] — window → `"HH:mm"` pair, duration breakdown
//! - [`record`] — task, routine, reminder and recurring-pattern validation
//! - [`error`] — Error types

pub mod clock;
pub mod error;
pub mod format;
pub mod record;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorKind, ScheduleError};
pub use format::{clock_pair, hour_pair, window_duration, WindowDuration};
pub use record::{
    ActivityLog, ActivityStatus, Priority, RecurrenceKind, RecurringPattern, Reminder, ReminderRequest,
    ReminderStatus, Routine, RoutinePatch, RoutineRequest, Task, TaskRequest,
};
pub use window::{
    parse_hour, resolve_absolute, resolve_clock_or_absolute, resolve_hour_pair, resolve_window,
    ExplicitPolicy, ResolvedWindow, TimeInput, TimeSpec, WindowMode, WindowOptions,
};
