//! Domain model for location reminders.
//!
//! # Responsibility
//! - Define the persisted reminder shape and its UI projection.
//!
//! # Invariants
//! - Every reminder is identified by a stable, non-empty `ReminderId`.
//! - Deletion is bulk-only; there is no tombstone state.

pub mod reminder;
