//! Derived history views over tasks and records.
//!
//! # Responsibility
//! - Classify each recorded date for the calendar heatmap.
//! - Build the per-date detail (recorded items plus unrecorded due tasks).
//! - Summarize the current Sunday-start week.
//! - Group every record into a newest-first timeline.
//!
//! # Invariants
//! - Views are pure functions of the lists passed in; nothing is cached.
//! - A record whose task no longer exists is still reported, with no title.

use crate::calendar::week_start;
use crate::model::record::{DailyRecord, RecordStatus};
use crate::model::task::{Task, TaskId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Heatmap classification of one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStatus {
    Completed,
    Partial,
    Postponed,
    /// More than one distinct status was recorded on the date.
    Mixed,
}

/// Week strip tone for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTone {
    /// Only completed records.
    Completed,
    /// Some completion or partial progress mixed with other statuses.
    Partial,
    /// Only postponed records.
    Postponed,
}

/// Record paired with its task title, if the task still exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedItem {
    pub record: Arc<DailyRecord>,
    pub task_title: Option<String>,
}

/// Detail for one selected date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub recorded: Vec<RecordedItem>,
    /// Active tasks due on `date` that have no record for it.
    pub unrecorded: Vec<Arc<Task>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub tone: Option<DayTone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummary {
    pub days: Vec<WeekDay>,
    pub recorded_days: usize,
}

/// Classifies every recorded date.
pub fn date_statuses(records: &[Arc<DailyRecord>]) -> BTreeMap<NaiveDate, DateStatus> {
    statuses_by_date(records)
        .into_iter()
        .map(|(date, statuses)| (date, classify_date(&statuses)))
        .collect()
}

fn classify_date(statuses: &BTreeSet<RecordStatus>) -> DateStatus {
    if statuses.len() > 1 {
        return DateStatus::Mixed;
    }
    match statuses.iter().next() {
        Some(RecordStatus::Completed) => DateStatus::Completed,
        Some(RecordStatus::Partial) => DateStatus::Partial,
        _ => DateStatus::Postponed,
    }
}

/// Builds the detail view for `date`.
pub fn day_summary(
    tasks: &[Arc<Task>],
    records: &[Arc<DailyRecord>],
    date: NaiveDate,
) -> DaySummary {
    let titles = title_index(tasks);

    let day_records: Vec<&Arc<DailyRecord>> =
        records.iter().filter(|record| record.date == date).collect();
    let recorded_ids: HashSet<&TaskId> =
        day_records.iter().map(|record| &record.task_id).collect();

    let recorded = day_records
        .into_iter()
        .map(|record| recorded_item(&titles, record))
        .collect();

    let unrecorded = tasks
        .iter()
        .filter(|task| task.is_active_on(date) && !recorded_ids.contains(&task.id))
        .cloned()
        .collect();

    DaySummary {
        date,
        recorded,
        unrecorded,
    }
}

/// Groups all records by date for the history timeline.
///
/// Dates are newest first; within a date, records are ordered by
/// `recorded_at`, newest first.
pub fn grouped_records(
    tasks: &[Arc<Task>],
    records: &[Arc<DailyRecord>],
) -> Vec<(NaiveDate, Vec<RecordedItem>)> {
    let titles = title_index(tasks);
    let mut by_date: BTreeMap<NaiveDate, Vec<RecordedItem>> = BTreeMap::new();
    for record in records {
        by_date
            .entry(record.date)
            .or_default()
            .push(recorded_item(&titles, record));
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, mut items)| {
            items.sort_by(|a, b| b.record.recorded_at.cmp(&a.record.recorded_at));
            (date, items)
        })
        .collect()
}

fn title_index(tasks: &[Arc<Task>]) -> HashMap<&TaskId, &str> {
    tasks
        .iter()
        .map(|task| (&task.id, task.title.as_str()))
        .collect()
}

fn recorded_item(titles: &HashMap<&TaskId, &str>, record: &Arc<DailyRecord>) -> RecordedItem {
    RecordedItem {
        task_title: titles.get(&record.task_id).map(|title| title.to_string()),
        record: Arc::clone(record),
    }
}

/// Summarizes the Sunday-start week containing `today`.
pub fn week_summary(records: &[Arc<DailyRecord>], today: NaiveDate) -> WeekSummary {
    let by_date = statuses_by_date(records);
    let days: Vec<WeekDay> = week_start(today)
        .iter_days()
        .take(7)
        .map(|date| WeekDay {
            date,
            tone: by_date.get(&date).map(day_tone),
        })
        .collect();
    let recorded_days = days.iter().filter(|day| day.tone.is_some()).count();

    WeekSummary {
        days,
        recorded_days,
    }
}

fn day_tone(statuses: &BTreeSet<RecordStatus>) -> DayTone {
    let has_completed = statuses.contains(&RecordStatus::Completed);
    if has_completed && statuses.len() == 1 {
        DayTone::Completed
    } else if has_completed || statuses.contains(&RecordStatus::Partial) {
        DayTone::Partial
    } else {
        DayTone::Postponed
    }
}

fn statuses_by_date(records: &[Arc<DailyRecord>]) -> BTreeMap<NaiveDate, BTreeSet<RecordStatus>> {
    let mut grouped: BTreeMap<NaiveDate, BTreeSet<RecordStatus>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.date).or_default().insert(record.status);
    }
    grouped
}
