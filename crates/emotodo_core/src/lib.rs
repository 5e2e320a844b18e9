//! Core domain logic for EmoTodo.
//! This crate is the single source of truth for task and record invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    parse_energy_level, validate_energy_level, DailyRecord, NewRecord, RecordId, RecordPatch,
    RecordStatus, RecordValidationError,
};
pub use model::task::{Difficulty, NewTask, Task, TaskId, TaskPatch, TaskValidationError};
pub use model::theme::ThemeMode;
pub use repo::kv_repo::{KeyValueStore, KvError, KvResult, SqliteKvStore};
pub use repo::storage::{
    Storage, StorageCause, StorageError, StorageResult, RECORDS_KEY, TASKS_KEY, THEME_KEY,
};
pub use service::history::{
    date_statuses, day_summary, grouped_records, week_summary, DateStatus, DaySummary, DayTone,
    RecordedItem, WeekDay, WeekSummary,
};
pub use service::record_ledger::{RecordLedger, RecordServiceError, RecordServiceResult};
pub use service::task_registry::{
    sample_tasks, TaskRegistry, TaskServiceError, TaskServiceResult,
};
pub use service::theme_preference::ThemePreference;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
