//! Reminder persistence: store implementations, repository, result contract.
//!
//! # Responsibility
//! - Isolate SQLite query details from view-model orchestration.
//! - Expose one data-source seam (`ReminderDataSource`) to callers.
//!
//! # Invariants
//! - Store access is serialized through the repository worker.
//! - Callers only ever see `OperationResult` values, never raw store errors.

pub mod reminder_repository;
pub mod reminder_store;
pub mod result;
