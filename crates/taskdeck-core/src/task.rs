//! Task record, priority levels, and new-task drafts.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::id::TaskId;
use crate::timestamp::{join_day, parse_timestamp, split_day};

/// How far ahead a due date counts as upcoming.
pub const UPCOMING_WINDOW: Duration = Duration::days(2);

/// Task priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Most urgent.
    High,
    /// Middle priority.
    Mid,
    /// Least urgent; used when nothing was chosen.
    #[default]
    Low,
}

impl Priority {
    /// Numeric rank used for ordering (low=1, mid=2, high=3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Mid => 2,
            Self::Low => 1,
        }
    }

    /// Wire name of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a priority name is not one of `high`, `mid`, `low`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority '{0}' (expected high, mid or low)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "mid" | "medium" => Ok(Self::Mid),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(s.to_owned())),
        }
    }
}

/// A dated, prioritized unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier assigned by the persistence service; `None` until created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    /// Task description.
    pub text: String,
    /// Due date-time, `"YYYY-MM-DD HH:MM"`, always derived from `date` and `time`.
    #[serde(default)]
    pub day: String,
    /// Reminder flag, carried but not interpreted.
    #[serde(default)]
    pub reminder: bool,
    /// Date half of `day`.
    #[serde(default)]
    pub date: String,
    /// Time half of `day`.
    #[serde(default)]
    pub time: String,
    /// Priority; `low` when unset.
    #[serde(default)]
    pub priority: Priority,
    /// RFC 3339 creation timestamp, never changed after creation.
    #[serde(default)]
    pub date_added: String,
    /// Completion flag.
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Re-derive `day` from `date` and `time`.
    pub fn sync_day(&mut self) {
        self.day = join_day(&self.date, &self.time);
    }

    /// Populate `date` and `time` from the stored `day`.
    pub fn split_day(&mut self) {
        if self.day.is_empty() {
            return;
        }
        let (date, time) = split_day(&self.day);
        self.date = date;
        self.time = time;
    }

    /// Due instant, if `day` parses.
    #[must_use]
    pub fn due_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.day)
    }

    /// Creation instant, if `dateAdded` parses.
    #[must_use]
    pub fn added_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.date_added)
    }

    /// Open and past its due date.
    #[must_use]
    pub fn is_overdue(&self, now: OffsetDateTime) -> bool {
        !self.done && self.due_at().is_some_and(|due| due < now)
    }

    /// Open and due within [`UPCOMING_WINDOW`] from `now`.
    #[must_use]
    pub fn is_upcoming(&self, now: OffsetDateTime) -> bool {
        !self.done
            && self
                .due_at()
                .is_some_and(|due| due > now && due <= now + UPCOMING_WINDOW)
    }
}

/// Reasons a draft is refused before reaching the persistence service.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Text was empty or only whitespace.
    #[error("task text must not be empty")]
    EmptyText,
    /// No due date was given.
    #[error("task date is required")]
    MissingDate,
    /// No due time was given.
    #[error("task time is required")]
    MissingTime,
}

/// User input for a task that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task description.
    pub text: String,
    /// Due date, `YYYY-MM-DD`.
    pub date: String,
    /// Due time, `HH:MM`.
    pub time: String,
    /// Requested priority; `low` when `None`.
    pub priority: Option<Priority>,
    /// Reminder flag.
    pub reminder: bool,
}

impl TaskDraft {
    /// Draft with the required fields and defaults for the rest.
    #[must_use]
    pub fn new(text: impl Into<String>, date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            date: date.into(),
            time: time.into(),
            ..Self::default()
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the reminder flag.
    #[must_use]
    pub const fn with_reminder(mut self, reminder: bool) -> Self {
        self.reminder = reminder;
        self
    }

    /// Check the required fields.
    ///
    /// # Errors
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingDate);
        }
        if self.time.trim().is_empty() {
            return Err(ValidationError::MissingTime);
        }
        Ok(())
    }

    /// Turn the draft into an unsaved task stamped with `date_added`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when a required field is missing.
    pub fn into_task(self, date_added: String) -> Result<Task, ValidationError> {
        self.validate()?;
        let Self {
            text,
            date,
            time,
            priority,
            reminder,
        } = self;
        let date = date.trim().to_owned();
        let time = time.trim().to_owned();
        Ok(Task {
            id: None,
            text: text.trim().to_owned(),
            day: join_day(&date, &time),
            reminder,
            date,
            time,
            priority: priority.unwrap_or_default(),
            date_added,
            done: false,
        })
    }
}
