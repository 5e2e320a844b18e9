//! Task registry: the authoritative in-memory task list.
//!
//! # Responsibility
//! - Load, create, update and delete task definitions.
//! - Answer "which tasks are due" for today or any browsed date.
//!
//! # Invariants
//! - Every mutation validates, then persists the full next list, then swaps
//!   it into memory. A failed step leaves the held list untouched.
//! - The held list is rebuilt on every mutation; unchanged entries keep their
//!   `Arc` identity and no entry is mutated in place.
//! - Update/delete of an unknown ID is a silent no-op with no write.
//! - Mutations take `&mut self`, so overlapping mutations on one registry
//!   cannot interleave.

use crate::calendar::today;
use crate::model::task::{Difficulty, NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::storage::{Storage, StorageError};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task registry operations.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(TaskValidationError),
    Storage(StorageError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for TaskServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Tasks seeded on first launch: every weekday, each with a difficulty.
pub fn sample_tasks() -> Vec<Task> {
    const EVERY_DAY: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];
    [
        ("아침 스트레칭 10분", 10, Difficulty::Easy),
        ("책 읽기", 15, Difficulty::Normal),
        ("영어 단어 5개 외우기", 5, Difficulty::Easy),
    ]
    .into_iter()
    .map(|(title, minutes, difficulty)| {
        NewTask::new(title, minutes, EVERY_DAY.to_vec())
            .with_difficulty(difficulty)
            .into_task()
    })
    .collect()
}

/// In-memory task list synchronized with the store adapter.
pub struct TaskRegistry<S: KeyValueStore> {
    storage: Storage<S>,
    tasks: Vec<Arc<Task>>,
    is_loading: bool,
}

impl<S: KeyValueStore> TaskRegistry<S> {
    /// Creates an empty registry. Call `load_tasks` before serving reads.
    pub fn new(storage: Storage<S>) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
            is_loading: false,
        }
    }

    /// Returns the last committed task list.
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Borrows the store adapter shared with the persisted layout.
    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    /// Loads tasks from storage, seeding samples when nothing is stored.
    ///
    /// # Errors
    /// - Read or seed-write failures propagate; the held list is unchanged.
    ///
    /// `is_loading` is reset on every exit path.
    pub fn load_tasks(&mut self) -> TaskServiceResult<()> {
        self.is_loading = true;
        let result = self.read_or_seed();
        self.is_loading = false;

        match result {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=task_registry status=ok count={}",
                    tasks.len()
                );
                self.tasks = tasks.into_iter().map(Arc::new).collect();
                Ok(())
            }
            Err(err) => {
                warn!("event=tasks_load module=task_registry status=error error={err}");
                Err(err)
            }
        }
    }

    fn read_or_seed(&self) -> TaskServiceResult<Vec<Task>> {
        match self.storage.get_tasks()? {
            Some(tasks) if !tasks.is_empty() => Ok(tasks),
            _ => {
                let samples = sample_tasks();
                self.storage.save_tasks(&samples)?;
                info!(
                    "event=tasks_seed module=task_registry status=ok count={}",
                    samples.len()
                );
                Ok(samples)
            }
        }
    }

    /// Creates a task and returns it once persisted.
    ///
    /// # Errors
    /// - `Validation` before any write.
    /// - `Storage` when the write fails; the held list is unchanged.
    pub fn add_task(&mut self, request: NewTask) -> TaskServiceResult<Arc<Task>> {
        let task = request.into_task();
        task.validate()?;

        let task = Arc::new(task);
        let mut next = self.tasks.clone();
        next.push(Arc::clone(&task));
        self.persist_and_commit(next)?;

        info!(
            "event=task_add module=task_registry status=ok task_id={} count={}",
            task.id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Shallow-merges `patch` into the task with `id`.
    ///
    /// No-op when `id` is unknown. Only the fields the patch supplies are
    /// validated before write.
    pub fn update_task(&mut self, id: &TaskId, patch: &TaskPatch) -> TaskServiceResult<()> {
        if !self.tasks.iter().any(|task| task.id == *id) {
            debug!("event=task_update module=task_registry status=noop task_id={id}");
            return Ok(());
        }
        if let Err(err) = patch.validate() {
            warn!("event=task_update module=task_registry status=rejected task_id={id} error={err}");
            return Err(err.into());
        }

        let next: Vec<Arc<Task>> = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == *id {
                    Arc::new(patch.merged_onto(task))
                } else {
                    Arc::clone(task)
                }
            })
            .collect();
        self.persist_and_commit(next)?;

        info!("event=task_update module=task_registry status=ok task_id={id}");
        Ok(())
    }

    /// Removes the task with `id`. No-op when `id` is unknown.
    ///
    /// Records referencing the task are left in place.
    pub fn delete_task(&mut self, id: &TaskId) -> TaskServiceResult<()> {
        if !self.tasks.iter().any(|task| task.id == *id) {
            debug!("event=task_delete module=task_registry status=noop task_id={id}");
            return Ok(());
        }

        let next: Vec<Arc<Task>> = self
            .tasks
            .iter()
            .filter(|task| task.id != *id)
            .cloned()
            .collect();
        self.persist_and_commit(next)?;

        info!(
            "event=task_delete module=task_registry status=ok task_id={} count={}",
            id,
            self.tasks.len()
        );
        Ok(())
    }

    pub fn get_task(&self, id: &TaskId) -> Option<Arc<Task>> {
        self.tasks.iter().find(|task| task.id == *id).cloned()
    }

    /// Active tasks due on the local calendar date.
    pub fn get_today_tasks(&self) -> Vec<Arc<Task>> {
        self.get_tasks_for_date(today())
    }

    /// Active tasks due on `date`.
    pub fn get_tasks_for_date(&self, date: NaiveDate) -> Vec<Arc<Task>> {
        self.tasks
            .iter()
            .filter(|task| task.is_active_on(date))
            .cloned()
            .collect()
    }

    fn persist_and_commit(&mut self, next: Vec<Arc<Task>>) -> TaskServiceResult<()> {
        self.storage.save_tasks(&next)?;
        self.tasks = next;
        Ok(())
    }
}
