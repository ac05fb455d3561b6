//! Uniform result contract returned by reminder data sources.
//!
//! # Invariants
//! - An `OperationResult` is either `Success` or `Error`, never both.
//! - Every `DataError` kind maps to one stable, user-facing message.

use crate::model::reminder::{ReminderId, ReminderRecord};
use crate::repo::reminder_store::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Message shown when a lookup targets an unknown id.
pub const REMINDER_NOT_FOUND_MESSAGE: &str = "Reminder not found!";
/// Message shown when the data source refuses to serve requests.
pub const DATA_SOURCE_UNAVAILABLE_MESSAGE: &str = "Reminder data source unavailable";

/// Error kinds surfaced to view-models and UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// No reminder exists with the requested id.
    NotFound(ReminderId),
    /// Forced failure (fault injection) or a stopped repository worker.
    Unavailable,
    /// Storage-layer failure, with the underlying detail.
    Storage(String),
}

impl DataError {
    /// Returns the message shown to users for this error.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(_) => REMINDER_NOT_FOUND_MESSAGE.to_string(),
            Self::Unavailable => DATA_SOURCE_UNAVAILABLE_MESSAGE.to_string(),
            Self::Storage(detail) => format!("Reminder storage failed: {detail}"),
        }
    }

    /// Stable machine-readable code, used in logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unavailable => "unavailable",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl Error for DataError {}

impl From<RepoError> for DataError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value.to_string())
    }
}

/// Tagged outcome of a data source operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success(T),
    Error(DataError),
}

impl<T> OperationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the success payload, dropping any error.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Returns the error, if any.
    pub fn error(&self) -> Option<&DataError> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        match self {
            Self::Success(value) => OperationResult::Success(f(value)),
            Self::Error(err) => OperationResult::Error(err),
        }
    }

    /// Converts into a std `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<T, DataError> {
        self.into()
    }
}

impl<T> From<Result<T, DataError>> for OperationResult<T> {
    fn from(value: Result<T, DataError>) -> Self {
        match value {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Error(err),
        }
    }
}

impl<T> From<OperationResult<T>> for Result<T, DataError> {
    fn from(value: OperationResult<T>) -> Self {
        match value {
            OperationResult::Success(value) => Ok(value),
            OperationResult::Error(err) => Err(err),
        }
    }
}

/// Data source contract consumed by view-models and the geofence handler.
pub trait ReminderDataSource {
    fn get_reminders(&self) -> OperationResult<Vec<ReminderRecord>>;
    fn get_reminder(&self, id: &str) -> OperationResult<ReminderRecord>;
    fn save_reminder(&self, reminder: ReminderRecord) -> OperationResult<()>;
    fn delete_all_reminders(&self) -> OperationResult<()>;
}

impl<D: ReminderDataSource + ?Sized> ReminderDataSource for &D {
    fn get_reminders(&self) -> OperationResult<Vec<ReminderRecord>> {
        (**self).get_reminders()
    }

    fn get_reminder(&self, id: &str) -> OperationResult<ReminderRecord> {
        (**self).get_reminder(id)
    }

    fn save_reminder(&self, reminder: ReminderRecord) -> OperationResult<()> {
        (**self).save_reminder(reminder)
    }

    fn delete_all_reminders(&self) -> OperationResult<()> {
        (**self).delete_all_reminders()
    }
}

impl<D: ReminderDataSource + ?Sized> ReminderDataSource for Arc<D> {
    fn get_reminders(&self) -> OperationResult<Vec<ReminderRecord>> {
        (**self).get_reminders()
    }

    fn get_reminder(&self, id: &str) -> OperationResult<ReminderRecord> {
        (**self).get_reminder(id)
    }

    fn save_reminder(&self, reminder: ReminderRecord) -> OperationResult<()> {
        (**self).save_reminder(reminder)
    }

    fn delete_all_reminders(&self) -> OperationResult<()> {
        (**self).delete_all_reminders()
    }
}
