//! Error types for taskwindow operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("{field}: {error}")]
    Field {
        field: String,
        error: Box<ScheduleError>,
    },
}

/// Discriminant of a [`ScheduleError`], with any field attribution stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    OutOfRange,
    InvalidWindow,
    MissingField,
    InvalidValue,
    InvalidTimezone,
}

impl ScheduleError {
    /// The rule that was violated.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            ScheduleError::OutOfRange(_) => ErrorKind::OutOfRange,
            ScheduleError::InvalidWindow(_) => ErrorKind::InvalidWindow,
            ScheduleError::MissingField(_) => ErrorKind::MissingField,
            ScheduleError::InvalidValue(_) => ErrorKind::InvalidValue,
            ScheduleError::InvalidTimezone(_) => ErrorKind::InvalidTimezone,
            ScheduleError::Field { error, .. } => error.kind(),
        }
    }

    /// The request field the error concerns, if one was attached.
    pub fn field(&self) -> Option<&str> {
        match self {
            ScheduleError::Field { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    /// Attribute this error to `field`. An existing attribution is kept.
    pub fn at(self, field: &str) -> Self {
        match self {
            ScheduleError::Field { .. } => self,
            other => ScheduleError::Field {
                field: field.to_string(),
                error: Box::new(other),
            },
        }
    }

    /// Replace the field name `from` with `to`. Other errors pass through.
    pub fn renamed(self, from: &str, to: &str) -> Self {
        match self {
            ScheduleError::Field { field, error } if field == from => ScheduleError::Field {
                field: to.to_string(),
                error,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
