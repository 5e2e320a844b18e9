//! Record ledger: the authoritative in-memory list of daily records.
//!
//! # Responsibility
//! - Load, create and update daily records.
//! - Answer date- and task-indexed record queries.
//!
//! # Invariants
//! - `energy_level` is validated strictly before any persistence call; a
//!   rejected input performs zero writes and changes nothing in memory.
//! - Every accepted mutation persists the full next list before swapping it
//!   into memory.
//! - Records are never deleted and duplicates per task+date are not rejected.
//! - `task_id` is a weak reference; no query requires the task to exist.

use crate::calendar::today;
use crate::model::record::{
    DailyRecord, NewRecord, RecordId, RecordPatch, RecordValidationError,
};
use crate::model::task::TaskId;
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::storage::{Storage, StorageError};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RecordServiceResult<T> = Result<T, RecordServiceError>;

/// Service error for record ledger operations.
#[derive(Debug)]
pub enum RecordServiceError {
    Validation(RecordValidationError),
    Storage(StorageError),
}

impl Display for RecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for RecordServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RecordServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// In-memory record list synchronized with the store adapter.
pub struct RecordLedger<S: KeyValueStore> {
    storage: Storage<S>,
    records: Vec<Arc<DailyRecord>>,
    is_loading: bool,
}

impl<S: KeyValueStore> RecordLedger<S> {
    /// Creates an empty ledger. Call `load_records` before serving reads.
    pub fn new(storage: Storage<S>) -> Self {
        Self {
            storage,
            records: Vec::new(),
            is_loading: false,
        }
    }

    /// Returns the last committed record list.
    pub fn records(&self) -> &[Arc<DailyRecord>] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    /// Loads records from storage. Nothing stored means an empty ledger.
    ///
    /// Read failures propagate and leave the held list unchanged.
    /// `is_loading` is reset on every exit path.
    pub fn load_records(&mut self) -> RecordServiceResult<()> {
        self.is_loading = true;
        let result = self.storage.get_records();
        self.is_loading = false;

        match result {
            Ok(stored) => {
                let records = stored.unwrap_or_default();
                info!(
                    "event=records_load module=record_ledger status=ok count={}",
                    records.len()
                );
                self.records = records.into_iter().map(Arc::new).collect();
                Ok(())
            }
            Err(err) => {
                warn!("event=records_load module=record_ledger status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Validates, persists and then commits a new record.
    ///
    /// # Errors
    /// - `Validation` when `energy_level` is outside `1..=5`; no write happens.
    /// - `Storage` when the write fails; the held list is unchanged.
    pub fn add_record(&mut self, input: NewRecord) -> RecordServiceResult<Arc<DailyRecord>> {
        if let Err(err) = input.validate() {
            warn!("event=record_add module=record_ledger status=rejected error={err}");
            return Err(err.into());
        }

        let record = Arc::new(input.into_record());
        let mut next = self.records.clone();
        next.push(Arc::clone(&record));
        self.persist_and_commit(next)?;

        info!(
            "event=record_add module=record_ledger status=ok record_id={} task_id={} count={}",
            record.id,
            record.task_id,
            self.records.len()
        );
        Ok(record)
    }

    /// Validates and shallow-merges `patch` into the record with `id`.
    ///
    /// Validation runs before the lookup, so an invalid patch is rejected
    /// even for unknown IDs. Unknown IDs are otherwise a silent no-op.
    pub fn update_record(&mut self, id: &RecordId, patch: &RecordPatch) -> RecordServiceResult<()> {
        if let Err(err) = patch.validate() {
            warn!("event=record_update module=record_ledger status=rejected record_id={id} error={err}");
            return Err(err.into());
        }

        if !self.records.iter().any(|record| record.id == *id) {
            debug!("event=record_update module=record_ledger status=noop record_id={id}");
            return Ok(());
        }

        let next: Vec<Arc<DailyRecord>> = self
            .records
            .iter()
            .map(|record| {
                if record.id == *id {
                    Arc::new(patch.merged_onto(record))
                } else {
                    Arc::clone(record)
                }
            })
            .collect();
        self.persist_and_commit(next)?;

        info!("event=record_update module=record_ledger status=ok record_id={id}");
        Ok(())
    }

    pub fn get_record(&self, id: &RecordId) -> Option<Arc<DailyRecord>> {
        self.records.iter().find(|record| record.id == *id).cloned()
    }

    /// First record for `task_id` dated today.
    pub fn get_today_record(&self, task_id: &TaskId) -> Option<Arc<DailyRecord>> {
        self.record_for(task_id, today())
    }

    /// First record for `task_id` on `date`.
    pub fn record_for(&self, task_id: &TaskId, date: NaiveDate) -> Option<Arc<DailyRecord>> {
        self.records
            .iter()
            .find(|record| record.task_id == *task_id && record.date == date)
            .cloned()
    }

    pub fn get_records_for_date(&self, date: NaiveDate) -> Vec<Arc<DailyRecord>> {
        self.records
            .iter()
            .filter(|record| record.date == date)
            .cloned()
            .collect()
    }

    pub fn get_records_for_task(&self, task_id: &TaskId) -> Vec<Arc<DailyRecord>> {
        self.records
            .iter()
            .filter(|record| record.task_id == *task_id)
            .cloned()
            .collect()
    }

    pub fn has_recorded_today(&self, task_id: &TaskId) -> bool {
        self.get_today_record(task_id).is_some()
    }

    fn persist_and_commit(&mut self, next: Vec<Arc<DailyRecord>>) -> RecordServiceResult<()> {
        self.storage.save_records(&next)?;
        self.records = next;
        Ok(())
    }
}
