//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `taskwindow`.
#[derive(Debug, Parser)]
#[command(
    name = "taskwindow",
    version,
    about = "Resolve task and routine time windows"
)]
pub struct Cli {
    /// IANA timezone whose calendar defines "today".
    #[arg(long, global = true, env = "TASKWINDOW_TZ", default_value = "UTC")]
    pub tz: String,

    /// Fixed "now" as RFC 3339, instead of the system clock.
    #[arg(long, global = true, env = "TASKWINDOW_NOW")]
    pub now: Option<String>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one time value ("HH:mm", hour, or date-time) to an instant.
    Resolve {
        /// The value to resolve.
        input: String,

        /// Treat INPUT as an hour-of-day number.
        #[arg(long, conflicts_with = "absolute_only")]
        hour: bool,

        /// Accept only full date-time strings.
        #[arg(long)]
        absolute_only: bool,
    },
    /// Resolve a start/end pair to a validated window.
    Window {
        start: String,
        end: String,

        /// START and END are hours of day; the end rolls over midnight.
        #[arg(long, conflicts_with = "absolute_only")]
        hours: bool,

        /// Accept only full date-time strings.
        #[arg(long)]
        absolute_only: bool,
    },
    /// Validate a create-task JSON body.
    Task {
        /// Path to the body, or `-` for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
    },
    /// Validate a create-routine JSON body.
    Routine {
        /// Path to the body, or `-` for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
    },
    /// Validate a create-reminder JSON body.
    Reminder {
        /// Path to the body, or `-` for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
    },
}
