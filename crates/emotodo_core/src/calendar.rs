//! Calendar date helpers shared by scheduling and history views.
//!
//! # Responsibility
//! - Provide the single definition of "today" and weekday indexing.
//! - Resolve task due-ness from raw scheduling inputs.
//! - Build the fixed 6x7 month grid used by calendar views.
//!
//! # Invariants
//! - Weekday indices are Sunday-based: 0 = Sunday ... 6 = Saturday.
//! - Months passed to grid helpers are zero-based (0 = January).
//! - Month grids always contain exactly `CALENDAR_GRID_CELLS` cells.

use chrono::{Datelike, Local, NaiveDate};

pub const CALENDAR_GRID_CELLS: usize = 42;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` date string.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    // chrono accepts single-digit months/days; the stored format does not.
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

/// Returns the Sunday-based weekday index of `date`.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Resolves due-ness from raw scheduling inputs.
///
/// - `scheduled_date = Some(d)`: due iff `d == date`, whatever `repeat_days` says.
/// - `scheduled_date = None`: due iff the weekday of `date` is in `repeat_days`.
pub fn is_task_scheduled_for_date(
    repeat_days: &[u8],
    scheduled_date: Option<NaiveDate>,
    date: NaiveDate,
) -> bool {
    match scheduled_date {
        Some(scheduled) => scheduled == date,
        None => repeat_days.contains(&weekday_index(date)),
    }
}

/// Builds the Sunday-first month grid for `year` and zero-based `month0`.
///
/// Leading cells before the first day and trailing cells after the last day
/// are `None`. Returns an empty grid when `month0 > 11`.
pub fn calendar_days(year: i32, month0: u32) -> Vec<Option<NaiveDate>> {
    let Some(first) = month0
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
    else {
        return Vec::new();
    };

    let leading = weekday_index(first) as usize;
    let mut cells: Vec<Option<NaiveDate>> = vec![None; leading];
    cells.extend(
        first
            .iter_days()
            .take_while(|day| day.month() == first.month())
            .map(Some),
    );
    cells.resize(CALENDAR_GRID_CELLS, None);
    cells
}

/// Moves a `(year, month0)` pair by `delta` months, wrapping years.
pub fn shift_month(year: i32, month0: u32, delta: i32) -> (i32, u32) {
    let absolute = year * 12 + month0 as i32 + delta;
    (absolute.div_euclid(12), absolute.rem_euclid(12) as u32)
}

/// Returns the Sunday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(weekday_index(date)))
}
