//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `emotodo_core` linkage.
//! - Print today's due tasks from a throwaway in-memory store.

use emotodo_core::calendar::{format_date, today};
use emotodo_core::{SqliteKvStore, Storage, TaskRegistry};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("emotodo_core ping={}", emotodo_core::ping());
    println!("emotodo_core version={}", emotodo_core::core_version());

    let store = match SqliteKvStore::open_in_memory() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store open failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut registry = TaskRegistry::new(Storage::new(store));
    if let Err(err) = registry.load_tasks() {
        eprintln!("task load failed: {err}");
        return ExitCode::FAILURE;
    }

    let due = registry.get_today_tasks();
    println!("today={} due={}", format_date(today()), due.len());
    for task in due {
        println!("- {} ({} min)", task.title, task.estimated_minutes);
    }
    ExitCode::SUCCESS
}
