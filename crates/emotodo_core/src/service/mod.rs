//! Core use-case services.
//!
//! # Responsibility
//! - Hold the authoritative in-memory task and record lists.
//! - Orchestrate validate → persist → commit for every mutation.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - The host owns exactly one instance of each service and injects it.
//! - Services never bypass the store adapter to reach the medium.

pub mod history;
pub mod record_ledger;
pub mod task_registry;
pub mod theme_preference;
