//! Persistent store adapter over a key-value medium.
//!
//! # Responsibility
//! - Serialize task and record collections as JSON arrays under fixed keys.
//! - Persist the theme mode as a plain string.
//!
//! # Invariants
//! - Read, parse and write failures are returned, never replaced by defaults.
//! - A missing or empty stored value reads as `None`.
//! - `clear` removes the task and record keys together; the theme key survives.

use crate::model::record::DailyRecord;
use crate::model::task::Task;
use crate::model::theme::ThemeMode;
use crate::repo::kv_repo::{KeyValueStore, KvError};
use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TASKS_KEY: &str = "@emotodo/tasks";
pub const RECORDS_KEY: &str = "@emotodo/records";
pub const THEME_KEY: &str = "@emotodo/theme";

pub type StorageResult<T> = Result<T, StorageError>;

/// Underlying cause of a storage failure.
#[derive(Debug)]
pub enum StorageCause {
    Medium(KvError),
    Json(serde_json::Error),
}

impl Display for StorageCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medium(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl StorageCause {
    fn as_error(&self) -> &(dyn Error + 'static) {
        match self {
            Self::Medium(err) => err,
            Self::Json(err) => err,
        }
    }
}

/// Store adapter error. Always carries the original cause.
#[derive(Debug)]
pub enum StorageError {
    Read {
        collection: &'static str,
        cause: StorageCause,
    },
    Write {
        collection: &'static str,
        cause: StorageCause,
    },
    Clear {
        cause: KvError,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { collection, cause } => write!(f, "Failed to get {collection}: {cause}"),
            Self::Write { collection, cause } => {
                write!(f, "Failed to save {collection}: {cause}")
            }
            Self::Clear { cause } => write!(f, "Failed to clear storage: {cause}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { cause, .. } | Self::Write { cause, .. } => Some(cause.as_error()),
            Self::Clear { cause } => Some(cause),
        }
    }
}

/// JSON collection adapter. Holds no cache of its own.
pub struct Storage<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Borrows the underlying medium.
    pub fn medium(&self) -> &S {
        &self.kv
    }

    /// Reads the stored task list, or `None` when nothing is stored.
    pub fn get_tasks(&self) -> StorageResult<Option<Vec<Task>>> {
        self.read_json(TASKS_KEY, "tasks")
    }

    /// Replaces the stored task list.
    pub fn save_tasks<T: Borrow<Task>>(&self, tasks: &[T]) -> StorageResult<()> {
        let items: Vec<&Task> = tasks.iter().map(Borrow::borrow).collect();
        self.write_json(TASKS_KEY, "tasks", &items)
    }

    /// Reads the stored record list, or `None` when nothing is stored.
    pub fn get_records(&self) -> StorageResult<Option<Vec<DailyRecord>>> {
        self.read_json(RECORDS_KEY, "records")
    }

    /// Replaces the stored record list.
    pub fn save_records<T: Borrow<DailyRecord>>(&self, records: &[T]) -> StorageResult<()> {
        let items: Vec<&DailyRecord> = records.iter().map(Borrow::borrow).collect();
        self.write_json(RECORDS_KEY, "records", &items)
    }

    /// Reads the theme mode. Unknown stored values read as `None`.
    pub fn get_theme_mode(&self) -> StorageResult<Option<ThemeMode>> {
        let raw = self.kv.get_item(THEME_KEY).map_err(|err| {
            log_failure("storage_read", "theme", &err);
            StorageError::Read {
                collection: "theme",
                cause: StorageCause::Medium(err),
            }
        })?;
        Ok(raw.as_deref().and_then(ThemeMode::parse))
    }

    /// Persists the theme mode.
    pub fn set_theme_mode(&self, mode: ThemeMode) -> StorageResult<()> {
        self.kv.set_item(THEME_KEY, mode.as_str()).map_err(|err| {
            log_failure("storage_write", "theme", &err);
            StorageError::Write {
                collection: "theme",
                cause: StorageCause::Medium(err),
            }
        })
    }

    /// Removes the task and record collections in one step.
    pub fn clear(&self) -> StorageResult<()> {
        self.kv
            .multi_remove(&[TASKS_KEY, RECORDS_KEY])
            .map_err(|err| {
                log_failure("storage_clear", "all", &err);
                StorageError::Clear { cause: err }
            })
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        key: &str,
        collection: &'static str,
    ) -> StorageResult<Option<T>> {
        let raw = self.kv.get_item(key).map_err(|err| {
            log_failure("storage_read", collection, &err);
            StorageError::Read {
                collection,
                cause: StorageCause::Medium(err),
            }
        })?;

        match raw {
            Some(text) if !text.is_empty() => {
                let parsed = serde_json::from_str(&text).map_err(|err| {
                    log_failure("storage_read", collection, &err);
                    StorageError::Read {
                        collection,
                        cause: StorageCause::Json(err),
                    }
                })?;
                Ok(Some(parsed))
            }
            _ => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        collection: &'static str,
        value: &T,
    ) -> StorageResult<()> {
        let text = serde_json::to_string(value).map_err(|err| {
            log_failure("storage_write", collection, &err);
            StorageError::Write {
                collection,
                cause: StorageCause::Json(err),
            }
        })?;

        self.kv.set_item(key, &text).map_err(|err| {
            log_failure("storage_write", collection, &err);
            StorageError::Write {
                collection,
                cause: StorageCause::Medium(err),
            }
        })
    }
}

fn log_failure(event: &str, collection: &str, err: &dyn Display) {
    error!("event={event} module=storage status=error collection={collection} error={err}");
}
