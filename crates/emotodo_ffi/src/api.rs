//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task, record, history and theme use cases to Dart via FRB.
//! - Own the single process-wide host state backing those calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures surface as `ok=false` envelopes with a readable message.
//! - All calls are serialized through one host lock, so store mutations
//!   never interleave.

use emotodo_core::calendar::{calendar_days, format_date, parse_date, today};
use emotodo_core::{
    core_version as core_version_inner, date_statuses, day_summary, grouped_records,
    init_logging as init_logging_inner, parse_energy_level, ping as ping_inner, week_summary,
    DailyRecord, DateStatus, DayTone, Difficulty, NewRecord, NewTask, RecordId, RecordLedger,
    RecordPatch, RecordStatus, RecordedItem, SqliteKvStore, Storage, Task, TaskId, TaskPatch,
    TaskRegistry, ThemeMode, ThemePreference,
};
use log::warn;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const DB_FILE_NAME: &str = "emotodo.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static HOST: OnceCell<Mutex<HostState>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task definition as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub estimated_minutes: u32,
    /// Weekday indices, 0 = Sunday.
    pub repeat_days: Vec<u8>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub is_active: bool,
    /// `easy|normal|hard`.
    pub difficulty: Option<String>,
    /// `YYYY-MM-DD`; overrides `repeat_days` when present.
    pub scheduled_date: Option<String>,
}

/// Daily record as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordItem {
    pub id: String,
    pub task_id: String,
    pub date: String,
    /// `completed|partial|postponed`.
    pub status: String,
    pub emotion: Option<String>,
    pub energy_level: Option<u8>,
    pub reason: Option<String>,
    pub reason_note: Option<String>,
    pub note: Option<String>,
    pub recorded_at: String,
    /// `None` on records stored before timer tracking.
    pub used_timer: Option<bool>,
    pub actual_minutes: Option<u32>,
    pub timer_completed: Option<bool>,
}

/// List envelope for task queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// List envelope for record queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordListResponse {
    pub ok: bool,
    pub items: Vec<RecordItem>,
    pub message: String,
}

/// Generic action response envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// ID of the created or touched entity, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Fields for a new task. Optional strings use the same labels as `TaskItem`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub estimated_minutes: u32,
    pub repeat_days: Vec<u8>,
    pub difficulty: Option<String>,
    pub scheduled_date: Option<String>,
}

/// Partial task update. `None` leaves a field untouched; the `clear_*`
/// flags remove an optional field and win over a provided value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdateInput {
    pub title: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub repeat_days: Option<Vec<u8>>,
    pub is_active: Option<bool>,
    pub difficulty: Option<String>,
    pub clear_difficulty: bool,
    pub scheduled_date: Option<String>,
    pub clear_scheduled_date: bool,
}

/// Fields for a new record. `energy_level` arrives as a plain number and is
/// checked for being an integer in `1..=5`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInput {
    pub task_id: String,
    pub date: String,
    pub status: String,
    pub emotion: Option<String>,
    pub energy_level: Option<f64>,
    pub reason: Option<String>,
    pub reason_note: Option<String>,
    pub note: Option<String>,
    pub used_timer: Option<bool>,
    pub actual_minutes: Option<u32>,
    pub timer_completed: Option<bool>,
}

/// Partial record update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdateInput {
    pub date: Option<String>,
    pub status: Option<String>,
    pub emotion: Option<String>,
    pub energy_level: Option<f64>,
    pub reason: Option<String>,
    pub reason_note: Option<String>,
    pub note: Option<String>,
    pub used_timer: Option<bool>,
    pub actual_minutes: Option<u32>,
    pub timer_completed: Option<bool>,
}

/// Recorded entry in the day history and timeline views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecordItem {
    pub record: RecordItem,
    /// `None` when the task has since been deleted.
    pub task_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHistoryResponse {
    pub ok: bool,
    pub date: String,
    pub recorded: Vec<HistoryRecordItem>,
    pub unrecorded: Vec<TaskItem>,
    pub message: String,
}

/// One date of the history timeline, entries newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineGroup {
    pub date: String,
    pub records: Vec<HistoryRecordItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStatusItem {
    pub date: String,
    /// `completed|partial|postponed|mixed`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDayItem {
    pub date: String,
    /// `completed|partial|postponed`, or `None` when nothing was recorded.
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummaryResponse {
    pub ok: bool,
    pub days: Vec<WeekDayItem>,
    pub recorded_days: u32,
    pub message: String,
}

/// Loads tasks from storage, seeding sample tasks on first launch.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - On failure the previously loaded list stays in place.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_load() -> TaskListResponse {
    task_list("tasks_load", |host| {
        host.tasks.load_tasks().map_err(|err| err.to_string())?;
        Ok(host.tasks.tasks().iter().map(|task| to_task_item(task)).collect())
    })
}

/// Returns every loaded task, active or not.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_all() -> TaskListResponse {
    task_list("tasks_all", |host| {
        Ok(host.tasks.tasks().iter().map(|task| to_task_item(task)).collect())
    })
}

/// Active tasks due on the local calendar date.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_today() -> TaskListResponse {
    task_list("tasks_today", |host| {
        Ok(host
            .tasks
            .get_today_tasks()
            .iter()
            .map(|task| to_task_item(task))
            .collect())
    })
}

/// Active tasks due on `date` (`YYYY-MM-DD`).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_for_date(date: String) -> TaskListResponse {
    task_list("tasks_for_date", |host| {
        let date = parse_date_arg(&date)?;
        Ok(host
            .tasks
            .get_tasks_for_date(date)
            .iter()
            .map(|task| to_task_item(task))
            .collect())
    })
}

/// Looks up one task. Returns `None` for unknown or malformed IDs.
#[flutter_rust_bridge::frb(sync)]
pub fn task_get(task_id: String) -> Option<TaskItem> {
    with_host(|host| {
        let id: TaskId = parse_id(&task_id)?;
        Ok(host.tasks.get_task(&id).map(|task| to_task_item(&task)))
    })
    .ok()
    .flatten()
}

/// Creates a task.
///
/// # FFI contract
/// - Never panics.
/// - Returns the created task ID on success.
/// - Validation failures (blank title, zero minutes, bad weekday) write nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(input: TaskInput) -> ActionResponse {
    action("task_add", |host| {
        let mut request = NewTask::new(
            input.title.trim(),
            input.estimated_minutes,
            input.repeat_days,
        );
        if let Some(raw) = input.difficulty.as_deref() {
            request = request.with_difficulty(parse_difficulty(raw)?);
        }
        if let Some(raw) = input.scheduled_date.as_deref() {
            request = request.scheduled_on(parse_date_arg(raw)?);
        }
        let task = host.tasks.add_task(request).map_err(|err| err.to_string())?;
        Ok(ActionResponse::success("Task created.", Some(task.id.to_string())))
    })
}

/// Shallow-merges `input` into an existing task. Unknown IDs succeed without
/// changing anything.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update(task_id: String, input: TaskUpdateInput) -> ActionResponse {
    action("task_update", |host| {
        let id: TaskId = parse_id(&task_id)?;
        let patch = to_task_patch(input)?;
        host.tasks
            .update_task(&id, &patch)
            .map_err(|err| err.to_string())?;
        Ok(ActionResponse::success("Task updated.", Some(task_id.clone())))
    })
}

/// Deletes a task. Its records stay in place.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> ActionResponse {
    action("task_delete", |host| {
        let id: TaskId = parse_id(&task_id)?;
        host.tasks.delete_task(&id).map_err(|err| err.to_string())?;
        Ok(ActionResponse::success("Task deleted.", Some(task_id.clone())))
    })
}

/// Loads records from storage. Nothing stored yields an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn records_load() -> RecordListResponse {
    record_list("records_load", |host| {
        host.records.load_records().map_err(|err| err.to_string())?;
        Ok(host
            .records
            .records()
            .iter()
            .map(|record| to_record_item(record))
            .collect())
    })
}

/// Creates a record.
///
/// # FFI contract
/// - Never panics.
/// - `energy_level` outside `1..=5` or non-integer fails before any write.
#[flutter_rust_bridge::frb(sync)]
pub fn record_add(input: RecordInput) -> ActionResponse {
    action("record_add", |host| {
        let request = to_new_record(input)?;
        let record = host
            .records
            .add_record(request)
            .map_err(|err| err.to_string())?;
        Ok(ActionResponse::success(
            "Record saved.",
            Some(record.id.to_string()),
        ))
    })
}

/// Shallow-merges `input` into an existing record.
#[flutter_rust_bridge::frb(sync)]
pub fn record_update(record_id: String, input: RecordUpdateInput) -> ActionResponse {
    action("record_update", |host| {
        let id: RecordId = parse_id(&record_id)?;
        let patch = to_record_patch(input)?;
        host.records
            .update_record(&id, &patch)
            .map_err(|err| err.to_string())?;
        Ok(ActionResponse::success(
            "Record updated.",
            Some(record_id.clone()),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn records_for_date(date: String) -> RecordListResponse {
    record_list("records_for_date", |host| {
        let date = parse_date_arg(&date)?;
        Ok(host
            .records
            .get_records_for_date(date)
            .iter()
            .map(|record| to_record_item(record))
            .collect())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn records_for_task(task_id: String) -> RecordListResponse {
    record_list("records_for_task", |host| {
        let id: TaskId = parse_id(&task_id)?;
        Ok(host
            .records
            .get_records_for_task(&id)
            .iter()
            .map(|record| to_record_item(record))
            .collect())
    })
}

/// First record for `task_id` dated today, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn record_today(task_id: String) -> Option<RecordItem> {
    with_host(|host| {
        let id: TaskId = parse_id(&task_id)?;
        Ok(host
            .records
            .get_today_record(&id)
            .map(|record| to_record_item(&record)))
    })
    .ok()
    .flatten()
}

#[flutter_rust_bridge::frb(sync)]
pub fn has_recorded_today(task_id: String) -> bool {
    with_host(|host| {
        let id: TaskId = parse_id(&task_id)?;
        Ok(host.records.has_recorded_today(&id))
    })
    .unwrap_or(false)
}

/// Recorded and still-open tasks for `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn history_day(date: String) -> DayHistoryResponse {
    let result = with_host(|host| {
        let date = parse_date_arg(&date)?;
        Ok(day_summary(host.tasks.tasks(), host.records.records(), date))
    });
    match result {
        Ok(summary) => DayHistoryResponse {
            ok: true,
            date: format_date(summary.date),
            recorded: summary
                .recorded
                .iter()
                .map(to_history_item)
                .collect(),
            unrecorded: summary
                .unrecorded
                .iter()
                .map(|task| to_task_item(task))
                .collect(),
            message: String::new(),
        },
        Err(err) => DayHistoryResponse {
            ok: false,
            date,
            recorded: Vec::new(),
            unrecorded: Vec::new(),
            message: failure_message("history_day", &err),
        },
    }
}

/// Every record grouped by date, newest date first.
///
/// Entries whose task was deleted carry `task_title = None`.
#[flutter_rust_bridge::frb(sync)]
pub fn history_timeline() -> Vec<TimelineGroup> {
    with_host(|host| {
        Ok(grouped_records(host.tasks.tasks(), host.records.records())
            .into_iter()
            .map(|(date, items)| TimelineGroup {
                date: format_date(date),
                records: items.iter().map(to_history_item).collect(),
            })
            .collect())
    })
    .unwrap_or_default()
}

/// Heatmap status for every date that has at least one record.
#[flutter_rust_bridge::frb(sync)]
pub fn history_date_statuses() -> Vec<DateStatusItem> {
    with_host(|host| {
        Ok(date_statuses(host.records.records())
            .into_iter()
            .map(|(date, status)| DateStatusItem {
                date: format_date(date),
                status: date_status_label(status).to_string(),
            })
            .collect())
    })
    .unwrap_or_default()
}

/// Sunday-start week containing today.
#[flutter_rust_bridge::frb(sync)]
pub fn history_week() -> WeekSummaryResponse {
    match with_host(|host| Ok(week_summary(host.records.records(), today()))) {
        Ok(summary) => WeekSummaryResponse {
            ok: true,
            days: summary
                .days
                .iter()
                .map(|day| WeekDayItem {
                    date: format_date(day.date),
                    tone: day.tone.map(|tone| day_tone_label(tone).to_string()),
                })
                .collect(),
            recorded_days: u32::try_from(summary.recorded_days).unwrap_or(u32::MAX),
            message: String::new(),
        },
        Err(err) => WeekSummaryResponse {
            ok: false,
            days: Vec::new(),
            recorded_days: 0,
            message: failure_message("history_week", &err),
        },
    }
}

/// 42-cell month grid for a zero-based month. Leading and trailing blanks
/// are `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month(year: i32, month0: u32) -> Vec<Option<String>> {
    calendar_days(year, month0)
        .into_iter()
        .map(|day| day.map(format_date))
        .collect()
}

/// Loads the stored theme and returns the effective mode (`dark|light`).
#[flutter_rust_bridge::frb(sync)]
pub fn theme_load() -> String {
    with_host(|host| {
        host.theme.load_theme();
        Ok(host.theme.mode())
    })
    .unwrap_or_default()
    .as_str()
    .to_string()
}

/// Flips the theme and returns the new mode.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle() -> String {
    with_host(|host| Ok(host.theme.toggle_theme()))
        .unwrap_or_default()
        .as_str()
        .to_string()
}

/// Sets the theme to `dark` or `light`. Save failures are not reported.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_set(mode: String) -> ActionResponse {
    action("theme_set", |host| {
        let parsed = ThemeMode::parse(mode.trim())
            .ok_or_else(|| format!("unsupported theme `{mode}`; expected dark|light"))?;
        host.theme.set_theme(parsed);
        Ok(ActionResponse::success("Theme updated.", None))
    })
}

/// Removes all tasks and records, then reloads: tasks come back as samples.
///
/// The theme preference is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn storage_reset() -> ActionResponse {
    action("storage_reset", |host| {
        host.reset()?;
        Ok(ActionResponse::success("Storage cleared.", None))
    })
}

struct HostState {
    tasks: TaskRegistry<SqliteKvStore>,
    records: RecordLedger<SqliteKvStore>,
    theme: ThemePreference<SqliteKvStore>,
}

impl HostState {
    /// Opens one connection per service and loads all three from disk, so
    /// no mutation can run against an unloaded list.
    fn open(path: &Path) -> Result<Self, String> {
        let open = || {
            SqliteKvStore::open(path)
                .map(Storage::new)
                .map_err(|err| format!("store open failed: {err}"))
        };
        let mut host = Self {
            tasks: TaskRegistry::new(open()?),
            records: RecordLedger::new(open()?),
            theme: ThemePreference::new(open()?),
        };
        host.tasks.load_tasks().map_err(|err| err.to_string())?;
        host.records.load_records().map_err(|err| err.to_string())?;
        host.theme.load_theme();
        Ok(host)
    }

    fn reset(&mut self) -> Result<(), String> {
        self.tasks
            .storage()
            .clear()
            .map_err(|err| err.to_string())?;
        self.tasks.load_tasks().map_err(|err| err.to_string())?;
        self.records.load_records().map_err(|err| err.to_string())
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("EMOTODO_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_host<T>(f: impl FnOnce(&mut HostState) -> Result<T, String>) -> Result<T, String> {
    let host = HOST.get_or_try_init(|| HostState::open(&resolve_db_path()).map(Mutex::new))?;
    let mut guard = host
        .lock()
        .map_err(|_| "host state lock poisoned".to_string())?;
    f(&mut guard)
}

fn action(
    op: &str,
    f: impl FnOnce(&mut HostState) -> Result<ActionResponse, String>,
) -> ActionResponse {
    with_host(f).unwrap_or_else(|err| ActionResponse::failure(failure_message(op, &err)))
}

fn task_list(
    op: &str,
    f: impl FnOnce(&mut HostState) -> Result<Vec<TaskItem>, String>,
) -> TaskListResponse {
    match with_host(f) {
        Ok(items) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: failure_message(op, &err),
        },
    }
}

fn record_list(
    op: &str,
    f: impl FnOnce(&mut HostState) -> Result<Vec<RecordItem>, String>,
) -> RecordListResponse {
    match with_host(f) {
        Ok(items) => RecordListResponse {
            ok: true,
            message: format!("{} record(s).", items.len()),
            items,
        },
        Err(err) => RecordListResponse {
            ok: false,
            items: Vec::new(),
            message: failure_message(op, &err),
        },
    }
}

fn failure_message(op: &str, err: &str) -> String {
    warn!("event=ffi_call module=ffi status=error op={op}");
    format!("{op} failed: {err}")
}

/// IDs are opaque; only blank input is rejected.
fn parse_id<T: From<String>>(raw: &str) -> Result<T, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("id must not be empty".to_string());
    }
    Ok(T::from(trimmed.to_string()))
}

fn parse_date_arg(raw: &str) -> Result<chrono::NaiveDate, String> {
    parse_date(raw.trim()).ok_or_else(|| format!("invalid date `{raw}`; expected YYYY-MM-DD"))
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    match raw.trim() {
        "easy" => Ok(Difficulty::Easy),
        "normal" => Ok(Difficulty::Normal),
        "hard" => Ok(Difficulty::Hard),
        other => Err(format!(
            "unsupported difficulty `{other}`; expected easy|normal|hard"
        )),
    }
}

fn parse_status(raw: &str) -> Result<RecordStatus, String> {
    match raw.trim() {
        "completed" => Ok(RecordStatus::Completed),
        "partial" => Ok(RecordStatus::Partial),
        "postponed" => Ok(RecordStatus::Postponed),
        other => Err(format!(
            "unsupported status `{other}`; expected completed|partial|postponed"
        )),
    }
}

fn parse_energy(raw: Option<f64>) -> Result<Option<u8>, String> {
    raw.map(parse_energy_level)
        .transpose()
        .map_err(|err| err.to_string())
}

fn to_task_patch(input: TaskUpdateInput) -> Result<TaskPatch, String> {
    let difficulty = if input.clear_difficulty {
        Some(None)
    } else {
        input
            .difficulty
            .as_deref()
            .map(parse_difficulty)
            .transpose()?
            .map(Some)
    };
    let scheduled_date = if input.clear_scheduled_date {
        Some(None)
    } else {
        input
            .scheduled_date
            .as_deref()
            .map(parse_date_arg)
            .transpose()?
            .map(Some)
    };
    Ok(TaskPatch {
        title: input.title.map(|title| title.trim().to_string()),
        estimated_minutes: input.estimated_minutes,
        repeat_days: input.repeat_days,
        is_active: input.is_active,
        difficulty,
        scheduled_date,
    })
}

fn to_new_record(input: RecordInput) -> Result<NewRecord, String> {
    let mut record = NewRecord::new(
        parse_id(&input.task_id)?,
        parse_date_arg(&input.date)?,
        parse_status(&input.status)?,
    );
    record.energy_level = parse_energy(input.energy_level)?;
    record.emotion = input.emotion;
    record.reason = input.reason;
    record.reason_note = input.reason_note;
    record.note = input.note;
    record.used_timer = input.used_timer;
    record.actual_minutes = input.actual_minutes;
    record.timer_completed = input.timer_completed;
    Ok(record)
}

fn to_record_patch(input: RecordUpdateInput) -> Result<RecordPatch, String> {
    Ok(RecordPatch {
        date: input.date.as_deref().map(parse_date_arg).transpose()?,
        status: input.status.as_deref().map(parse_status).transpose()?,
        emotion: input.emotion.map(Some),
        energy_level: parse_energy(input.energy_level)?.map(Some),
        reason: input.reason.map(Some),
        reason_note: input.reason_note.map(Some),
        note: input.note.map(Some),
        used_timer: input.used_timer.map(Some),
        actual_minutes: input.actual_minutes.map(Some),
        timer_completed: input.timer_completed.map(Some),
    })
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        estimated_minutes: task.estimated_minutes,
        repeat_days: task.repeat_days.clone(),
        created_at: task.created_at.to_rfc3339(),
        is_active: task.is_active,
        difficulty: task
            .difficulty
            .map(|difficulty| difficulty_label(difficulty).to_string()),
        scheduled_date: task.scheduled_date.map(format_date),
    }
}

fn to_record_item(record: &DailyRecord) -> RecordItem {
    RecordItem {
        id: record.id.to_string(),
        task_id: record.task_id.to_string(),
        date: format_date(record.date),
        status: status_label(record.status).to_string(),
        emotion: record.emotion.clone(),
        energy_level: record.energy_level,
        reason: record.reason.clone(),
        reason_note: record.reason_note.clone(),
        note: record.note.clone(),
        recorded_at: record.recorded_at.to_rfc3339(),
        used_timer: record.used_timer,
        actual_minutes: record.actual_minutes,
        timer_completed: record.timer_completed,
    }
}

fn to_history_item(item: &RecordedItem) -> HistoryRecordItem {
    HistoryRecordItem {
        record: to_record_item(&item.record),
        task_title: item.task_title.clone(),
    }
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Normal => "normal",
        Difficulty::Hard => "hard",
    }
}

fn status_label(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Completed => "completed",
        RecordStatus::Partial => "partial",
        RecordStatus::Postponed => "postponed",
    }
}

fn date_status_label(status: DateStatus) -> &'static str {
    match status {
        DateStatus::Completed => "completed",
        DateStatus::Partial => "partial",
        DateStatus::Postponed => "postponed",
        DateStatus::Mixed => "mixed",
    }
}

fn day_tone_label(tone: DayTone) -> &'static str {
    match tone {
        DayTone::Completed => "completed",
        DayTone::Partial => "partial",
        DayTone::Postponed => "postponed",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_month, core_version, has_recorded_today, history_timeline, init_logging, ping,
        record_add, record_today, record_update, records_for_date, records_for_task, task_add,
        task_delete, task_get, task_update, tasks_for_date, tasks_load, theme_set, to_task_patch,
        HostState, RecordInput, RecordUpdateInput, TaskInput, TaskUpdateInput,
    };
    use emotodo_core::calendar::{format_date, today};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn tasks_load_returns_at_least_the_seeded_samples() {
        let response = tasks_load();
        assert!(response.ok, "{}", response.message);
        assert!(response.items.len() >= 3);
    }

    #[test]
    fn task_add_then_get_update_and_delete() {
        let title = unique_token("task");
        let created = task_add(TaskInput {
            title: title.clone(),
            estimated_minutes: 10,
            repeat_days: vec![1, 3],
            difficulty: Some("hard".to_string()),
            scheduled_date: None,
        });
        assert!(created.ok, "{}", created.message);
        let task_id = created.id.expect("created task should return id");

        let loaded = task_get(task_id.clone()).expect("task should exist");
        assert_eq!(loaded.title, title);
        assert_eq!(loaded.difficulty.as_deref(), Some("hard"));

        let updated = task_update(
            task_id.clone(),
            TaskUpdateInput {
                is_active: Some(false),
                clear_difficulty: true,
                ..TaskUpdateInput::default()
            },
        );
        assert!(updated.ok, "{}", updated.message);
        let loaded = task_get(task_id.clone()).expect("task should still exist");
        assert!(!loaded.is_active);
        assert_eq!(loaded.difficulty, None);

        assert!(task_delete(task_id.clone()).ok);
        assert!(task_get(task_id).is_none());
    }

    #[test]
    fn task_add_rejects_blank_title_and_bad_labels() {
        let blank = task_add(TaskInput {
            title: "   ".to_string(),
            estimated_minutes: 10,
            repeat_days: vec![1],
            difficulty: None,
            scheduled_date: None,
        });
        assert!(!blank.ok);
        assert!(blank.message.starts_with("task_add failed"));

        let bad_difficulty = task_add(TaskInput {
            title: "valid".to_string(),
            estimated_minutes: 10,
            repeat_days: vec![1],
            difficulty: Some("extreme".to_string()),
            scheduled_date: None,
        });
        assert!(!bad_difficulty.ok);
        assert!(bad_difficulty.message.contains("difficulty"));
    }

    #[test]
    fn scheduled_task_shows_up_only_on_its_date() {
        let created = task_add(TaskInput {
            title: unique_token("one-off"),
            estimated_minutes: 30,
            repeat_days: vec![0, 1, 2, 3, 4, 5, 6],
            difficulty: None,
            scheduled_date: Some("2031-05-06".to_string()),
        });
        assert!(created.ok, "{}", created.message);
        let task_id = created.id.unwrap();

        let on_date = tasks_for_date("2031-05-06".to_string());
        let next_day = tasks_for_date("2031-05-07".to_string());
        assert!(on_date.items.iter().any(|task| task.id == task_id));
        assert!(!next_day.items.iter().any(|task| task.id == task_id));
        assert!(!tasks_for_date("05/06/2031".to_string()).ok);
    }

    #[test]
    fn record_add_validates_energy_level_at_the_boundary() {
        let task_id = unique_token("task");
        for energy in [0.0, 6.0, 2.5] {
            let response = record_add(record_input(&task_id, "2026-02-08", Some(energy)));
            assert!(!response.ok);
            assert!(response.message.contains("energyLevel"), "{}", response.message);
        }
        assert!(records_for_task(task_id).items.is_empty());
    }

    #[test]
    fn record_add_update_and_query() {
        let task_id = unique_token("task");
        let created = record_add(record_input(&task_id, "2026-02-08", Some(3.0)));
        assert!(created.ok, "{}", created.message);
        let record_id = created.id.unwrap();

        let on_date = records_for_date("2026-02-08".to_string());
        let found = on_date
            .items
            .iter()
            .find(|record| record.id == record_id)
            .expect("record should be listed for its date");
        assert_eq!(found.energy_level, Some(3));
        assert_eq!(found.status, "partial");

        let updated = record_update(
            record_id.clone(),
            RecordUpdateInput {
                status: Some("completed".to_string()),
                energy_level: Some(5.0),
                ..RecordUpdateInput::default()
            },
        );
        assert!(updated.ok, "{}", updated.message);
        let for_task = records_for_task(task_id.clone());
        assert_eq!(for_task.items.len(), 1);
        assert_eq!(for_task.items[0].status, "completed");
        assert_eq!(for_task.items[0].energy_level, Some(5));

        assert!(!has_recorded_today(task_id.clone()));
        let today_text = format_date(today());
        assert!(record_add(record_input(&task_id, &today_text, None)).ok);
        assert!(has_recorded_today(task_id.clone()));
        assert_eq!(record_today(task_id).unwrap().date, today_text);
    }

    #[test]
    fn opaque_ids_are_accepted_and_blank_ids_rejected() {
        let task_id = unique_token("t1");
        let created = record_add(record_input(&task_id, "2026-02-08", None));
        assert!(created.ok, "{}", created.message);

        let listed = records_for_task(task_id.clone());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].task_id, task_id);
        assert_eq!(listed.items[0].used_timer, None);

        assert!(task_update("t1-unknown".to_string(), TaskUpdateInput::default()).ok);
        assert!(!records_for_task("  ".to_string()).ok);
        assert!(!task_delete(String::new()).ok);
    }

    #[test]
    fn history_timeline_groups_newest_first_and_marks_deleted_tasks() {
        let created = task_add(TaskInput {
            title: unique_token("Timeline"),
            estimated_minutes: 10,
            repeat_days: vec![1],
            difficulty: None,
            scheduled_date: None,
        });
        let live_id = created.id.unwrap();
        let gone_id = unique_token("gone");
        assert!(record_add(record_input(&live_id, "2031-03-03", None)).ok);
        assert!(record_add(record_input(&gone_id, "2031-03-04", None)).ok);

        let timeline = history_timeline();
        let position = |date: &str| timeline.iter().position(|group| group.date == date);
        let (Some(earlier), Some(later)) = (position("2031-03-03"), position("2031-03-04")) else {
            panic!("both dates should be present in the timeline");
        };
        assert!(later < earlier);

        let live = timeline[earlier]
            .records
            .iter()
            .find(|item| item.record.task_id == live_id)
            .expect("live task record should be grouped under its date");
        assert!(live.task_title.as_deref().unwrap().starts_with("Timeline"));
        let gone = timeline[later]
            .records
            .iter()
            .find(|item| item.record.task_id == gone_id)
            .expect("record of a missing task should still be listed");
        assert_eq!(gone.task_title, None);
    }

    #[test]
    fn theme_set_rejects_unknown_mode() {
        let response = theme_set("sepia".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("dark|light"));
    }

    #[test]
    fn calendar_month_pads_to_full_grid() {
        let cells = calendar_month(2026, 1);
        assert_eq!(cells.len(), 42);
        assert_eq!(cells[0].as_deref(), Some("2026-02-01"));
        assert!(calendar_month(2026, 12).is_empty());
    }

    #[test]
    fn task_patch_clear_flag_wins_over_value() {
        let patch = to_task_patch(TaskUpdateInput {
            scheduled_date: Some("2026-02-08".to_string()),
            clear_scheduled_date: true,
            ..TaskUpdateInput::default()
        })
        .unwrap();
        assert_eq!(patch.scheduled_date, Some(None));
        assert_eq!(patch.difficulty, None);
    }

    #[test]
    fn host_reset_reseeds_tasks_and_empties_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = HostState::open(&dir.path().join("reset.sqlite3")).unwrap();
        let seeded_ids: Vec<_> = host
            .tasks
            .tasks()
            .iter()
            .map(|task| task.id.clone())
            .collect();
        let task_id = seeded_ids[0].clone();
        host.records
            .add_record(emotodo_core::NewRecord::new(
                task_id,
                today(),
                emotodo_core::RecordStatus::Completed,
            ))
            .unwrap();
        host.theme.set_theme(emotodo_core::ThemeMode::Light);

        host.reset().unwrap();

        assert!(host.records.records().is_empty());
        assert_eq!(host.tasks.tasks().len(), 3);
        assert!(host
            .tasks
            .tasks()
            .iter()
            .all(|task| !seeded_ids.contains(&task.id)));
        host.theme.load_theme();
        assert_eq!(host.theme.mode(), emotodo_core::ThemeMode::Light);
    }

    fn record_input(task_id: &str, date: &str, energy_level: Option<f64>) -> RecordInput {
        RecordInput {
            task_id: task_id.to_string(),
            date: date.to_string(),
            status: "partial".to_string(),
            emotion: Some("calm".to_string()),
            energy_level,
            reason: None,
            reason_note: None,
            note: None,
            used_timer: None,
            actual_minutes: None,
            timer_completed: None,
        }
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
