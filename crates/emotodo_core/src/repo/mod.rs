//! Persistence layer: key-value medium and the JSON store adapter.
//!
//! # Responsibility
//! - Define the flat key-value contract the adapter writes through.
//! - Isolate SQLite details from registry/ledger orchestration.
//!
//! # Invariants
//! - Only the store adapter reads or writes the `@emotodo/*` collections.
//! - Medium and JSON failures surface as `StorageError` with their cause.

pub mod kv_repo;
pub mod storage;
