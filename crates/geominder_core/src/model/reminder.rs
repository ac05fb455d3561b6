//! Reminder domain model.
//!
//! # Responsibility
//! - Define the persisted reminder record and its display projection.
//! - Generate stable ids for reminders created without one.
//!
//! # Invariants
//! - `id` is never empty and uniquely identifies a reminder.
//! - Title/location presence is enforced by the save flow, not here.
//! - Records and display items carry the same fields and convert losslessly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a reminder.
///
/// Kept as a string because ids may be supplied by callers (import, tests)
/// as well as generated.
pub type ReminderId = String;

/// Generates a fresh reminder id (UUID v4, hyphenated).
pub fn new_reminder_id() -> ReminderId {
    Uuid::new_v4().to_string()
}

/// Location label used when a bare map point (not a named place) is picked.
pub fn coordinate_snippet(latitude: f64, longitude: f64) -> String {
    format!("Lat: {latitude:.5}\nLong: {longitude:.5}")
}

/// Persisted reminder entity.
///
/// Every column except `id` is nullable in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub id: ReminderId,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Human-readable place name or coordinate snippet from the map picker.
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ReminderRecord {
    /// Creates a record with a generated id and no optional fields set.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(new_reminder_id(), title)
    }

    /// Creates a record with a caller-provided id.
    pub fn with_id(id: impl Into<ReminderId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            description: None,
            location: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Returns `(latitude, longitude)` when both coordinates are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Display projection of a reminder used by list/save/notification flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderDataItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub id: ReminderId,
}

impl ReminderDataItem {
    /// Builds an item from editor input, generating a new id.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        location: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        Self {
            title,
            description,
            location,
            latitude,
            longitude,
            id: new_reminder_id(),
        }
    }

    /// Replaces the generated id with a caller-provided one.
    pub fn with_id(mut self, id: impl Into<ReminderId>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns `(latitude, longitude)` when both coordinates are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl From<ReminderRecord> for ReminderDataItem {
    fn from(record: ReminderRecord) -> Self {
        Self {
            title: record.title,
            description: record.description,
            location: record.location,
            latitude: record.latitude,
            longitude: record.longitude,
            id: record.id,
        }
    }
}

impl From<ReminderDataItem> for ReminderRecord {
    fn from(item: ReminderDataItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            location: item.location,
            latitude: item.latitude,
            longitude: item.longitude,
        }
    }
}
