//! Daily record domain model.
//!
//! # Responsibility
//! - Define the per-date snapshot of how a task went.
//! - Own the `energy_level` validation rule shared by add and update paths.
//!
//! # Invariants
//! - `id` and `recorded_at` never change after creation.
//! - `energy_level`, when present, is an integer in `1..=5`.
//! - `task_id` is a weak reference; the task may no longer exist.
//! - `emotion` and `reason` are free-form keys and are never validated here.

use crate::model::task::TaskId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier for a daily record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
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

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub const MIN_ENERGY_LEVEL: u8 = 1;
pub const MAX_ENERGY_LEVEL: u8 = 5;

/// How a task went on the recorded date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Completed,
    Partial,
    Postponed,
}

/// A persisted daily record owned by the record ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub id: RecordId,
    pub task_id: TaskId,
    /// Calendar date the record applies to, independent of `recorded_at`.
    pub date: NaiveDate,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
    /// Absent on records written before timer tracking existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_timer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_completed: Option<bool>,
}

/// Caller-supplied fields for a new record.
///
/// `id` and `recorded_at` are assigned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub status: RecordStatus,
    pub emotion: Option<String>,
    pub energy_level: Option<u8>,
    pub reason: Option<String>,
    pub reason_note: Option<String>,
    pub note: Option<String>,
    pub used_timer: Option<bool>,
    pub actual_minutes: Option<u32>,
    pub timer_completed: Option<bool>,
}

impl NewRecord {
    /// Creates input with only the required fields set.
    pub fn new(task_id: TaskId, date: NaiveDate, status: RecordStatus) -> Self {
        Self {
            task_id,
            date,
            status,
            emotion: None,
            energy_level: None,
            reason: None,
            reason_note: None,
            note: None,
            used_timer: None,
            actual_minutes: None,
            timer_completed: None,
        }
    }

    /// Validates input before any persistence attempt.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        match self.energy_level {
            Some(level) => validate_energy_level(level),
            None => Ok(()),
        }
    }

    /// Builds the persisted record with a generated ID and current timestamp.
    pub fn into_record(self) -> DailyRecord {
        DailyRecord {
            id: RecordId::generate(),
            task_id: self.task_id,
            date: self.date,
            status: self.status,
            emotion: self.emotion,
            energy_level: self.energy_level,
            reason: self.reason,
            reason_note: self.reason_note,
            note: self.note,
            recorded_at: Utc::now(),
            used_timer: self.used_timer,
            actual_minutes: self.actual_minutes,
            timer_completed: self.timer_completed,
        }
    }
}

/// Partial update for a record. `None` leaves a field untouched.
///
/// Optional fields use a nested `Option` so they can be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub date: Option<NaiveDate>,
    pub status: Option<RecordStatus>,
    pub emotion: Option<Option<String>>,
    pub energy_level: Option<Option<u8>>,
    pub reason: Option<Option<String>>,
    pub reason_note: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub used_timer: Option<Option<bool>>,
    pub actual_minutes: Option<Option<u32>>,
    pub timer_completed: Option<Option<bool>>,
}

impl RecordPatch {
    /// Validates `energy_level` when the patch sets one.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        match self.energy_level {
            Some(Some(level)) => validate_energy_level(level),
            _ => Ok(()),
        }
    }

    /// Returns a new record with this patch shallow-merged over `record`.
    ///
    /// `id`, `task_id` and `recorded_at` are always carried over.
    pub fn merged_onto(&self, record: &DailyRecord) -> DailyRecord {
        let mut merged = record.clone();
        if let Some(date) = self.date {
            merged.date = date;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(emotion) = &self.emotion {
            merged.emotion = emotion.clone();
        }
        if let Some(level) = self.energy_level {
            merged.energy_level = level;
        }
        if let Some(reason) = &self.reason {
            merged.reason = reason.clone();
        }
        if let Some(reason_note) = &self.reason_note {
            merged.reason_note = reason_note.clone();
        }
        if let Some(note) = &self.note {
            merged.note = note.clone();
        }
        if let Some(used_timer) = self.used_timer {
            merged.used_timer = used_timer;
        }
        if let Some(minutes) = self.actual_minutes {
            merged.actual_minutes = minutes;
        }
        if let Some(completed) = self.timer_completed {
            merged.timer_completed = completed;
        }
        merged
    }
}

/// Validation error for record input.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    EnergyLevelOutOfRange(u8),
    EnergyLevelNotInteger(f64),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnergyLevelOutOfRange(value) => write!(
                f,
                "energyLevel must be an integer between {MIN_ENERGY_LEVEL} and {MAX_ENERGY_LEVEL}, got {value}"
            ),
            Self::EnergyLevelNotInteger(value) => write!(
                f,
                "energyLevel must be an integer between {MIN_ENERGY_LEVEL} and {MAX_ENERGY_LEVEL}, got {value}"
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// Checks that `level` lies in `1..=5`.
pub fn validate_energy_level(level: u8) -> Result<(), RecordValidationError> {
    if (MIN_ENERGY_LEVEL..=MAX_ENERGY_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(RecordValidationError::EnergyLevelOutOfRange(level))
    }
}

/// Converts an untyped numeric energy level into a validated `u8`.
///
/// Used at boundaries where the caller sends plain numbers.
pub fn parse_energy_level(raw: f64) -> Result<u8, RecordValidationError> {
    if !raw.is_finite() || raw.fract() != 0.0 {
        return Err(RecordValidationError::EnergyLevelNotInteger(raw));
    }
    if raw < f64::from(MIN_ENERGY_LEVEL) || raw > f64::from(MAX_ENERGY_LEVEL) {
        let clamped = raw.clamp(0.0, f64::from(u8::MAX)) as u8;
        return Err(RecordValidationError::EnergyLevelOutOfRange(clamped));
    }
    let level = raw as u8;
    validate_energy_level(level)?;
    Ok(level)
}
