//! Domain model for tasks, daily records and the theme preference.
//!
//! # Responsibility
//! - Define the canonical shapes persisted under the `@emotodo/*` keys.
//! - Own field-level validation that must run before any write.
//!
//! # Invariants
//! - Every task and record is identified by a stable UUID.
//! - Task deletion is hard removal; `is_active` is a pause flag, not a tombstone.
//! - Serialized JSON uses camelCase keys and omits absent optional fields.

pub mod record;
pub mod task;
pub mod theme;
