//! Task domain model.
//!
//! # Responsibility
//! - Define the recurring or one-off unit of intended activity.
//! - Resolve whether a task is due on a given calendar date.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - When `scheduled_date` is set it is the only scheduling input;
//!   `repeat_days` is consulted only when it is absent.
//! - `repeat_days` entries are weekday indices in `0..=6` (0 = Sunday).

use crate::calendar::is_task_scheduled_for_date;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier for a task.
///
/// New IDs are random UUID strings, but any stored string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Presentation-only effort tag. Has no effect on scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

/// A task definition owned by the task registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub estimated_minutes: u32,
    /// Weekday indices, 0 = Sunday ... 6 = Saturday. May be empty.
    pub repeat_days: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Overrides `repeat_days` entirely when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

/// Validation error for task field invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    NonPositiveMinutes,
    InvalidRepeatDay(u8),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::NonPositiveMinutes => write!(f, "estimatedMinutes must be a positive integer"),
            Self::InvalidRepeatDay(day) => {
                write!(f, "repeatDays entry {day} is not a weekday index (0..=6)")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates a new active task with a generated ID and the current timestamp.
    ///
    /// Optional fields start as `None`; callers set them only when provided.
    pub fn new(title: impl Into<String>, estimated_minutes: u32, repeat_days: Vec<u8>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            estimated_minutes,
            repeat_days,
            created_at: Utc::now(),
            is_active: true,
            difficulty: None,
            scheduled_date: None,
        }
    }

    /// Validates field invariants before persistence.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is blank after trimming.
    /// - `NonPositiveMinutes` when `estimated_minutes == 0`.
    /// - `InvalidRepeatDay` for the first repeat day outside `0..=6`.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        check_title(&self.title)?;
        check_minutes(self.estimated_minutes)?;
        check_repeat_days(&self.repeat_days)
    }

    /// Returns whether this task is due on `date`, ignoring `is_active`.
    ///
    /// A scheduled date strictly dominates weekday recurrence.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        is_task_scheduled_for_date(&self.repeat_days, self.scheduled_date, date)
    }

    /// Returns whether this task belongs on the action list for `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.is_due_on(date)
    }
}

/// Request model for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub estimated_minutes: u32,
    pub repeat_days: Vec<u8>,
    pub difficulty: Option<Difficulty>,
    pub scheduled_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, estimated_minutes: u32, repeat_days: Vec<u8>) -> Self {
        Self {
            title: title.into(),
            estimated_minutes,
            repeat_days,
            difficulty: None,
            scheduled_date: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(date);
        self
    }

    /// Builds the task with a generated ID and current timestamp.
    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.title, self.estimated_minutes, self.repeat_days);
        task.difficulty = self.difficulty;
        task.scheduled_date = self.scheduled_date;
        task
    }
}

/// Partial update for a task. `None` leaves a field untouched.
///
/// Clearable optional fields use a nested `Option`: `Some(None)` removes the
/// value, `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub repeat_days: Option<Vec<u8>>,
    pub is_active: Option<bool>,
    pub difficulty: Option<Option<Difficulty>>,
    pub scheduled_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Validates only the fields this patch supplies.
    ///
    /// Untouched fields of the stored task are not re-checked, so a legacy
    /// task can still be paused or renamed.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(minutes) = self.estimated_minutes {
            check_minutes(minutes)?;
        }
        if let Some(days) = &self.repeat_days {
            check_repeat_days(days)?;
        }
        Ok(())
    }

    /// Returns a new task with this patch shallow-merged over `task`.
    ///
    /// `id` and `created_at` are always carried over from `task`.
    pub fn merged_onto(&self, task: &Task) -> Task {
        let mut merged = task.clone();
        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(minutes) = self.estimated_minutes {
            merged.estimated_minutes = minutes;
        }
        if let Some(days) = &self.repeat_days {
            merged.repeat_days = days.clone();
        }
        if let Some(active) = self.is_active {
            merged.is_active = active;
        }
        if let Some(difficulty) = self.difficulty {
            merged.difficulty = difficulty;
        }
        if let Some(scheduled) = self.scheduled_date {
            merged.scheduled_date = scheduled;
        }
        merged
    }
}

fn check_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

fn check_minutes(minutes: u32) -> Result<(), TaskValidationError> {
    if minutes == 0 {
        return Err(TaskValidationError::NonPositiveMinutes);
    }
    Ok(())
}

fn check_repeat_days(days: &[u8]) -> Result<(), TaskValidationError> {
    match days.iter().copied().find(|day| *day > 6) {
        Some(day) => Err(TaskValidationError::InvalidRepeatDay(day)),
        None => Ok(()),
    }
}
