//! Core domain logic for Geominder location reminders.
//! This crate owns persistence, view-model state and geofence consumption;
//! mobile and CLI front ends stay thin.

pub mod config;
pub mod db;
pub mod geofence;
pub mod logging;
pub mod model;
pub mod repo;
pub mod viewmodel;

pub use config::{ConfigError, CoreConfig};
pub use geofence::{
    regions_containing, GeofenceEvent, GeofenceRegion, GeofenceTransition,
    GeofenceTransitionHandler, ReminderNotification, ReminderNotifier, GEOFENCE_RADIUS_IN_METERS,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::reminder::{coordinate_snippet, ReminderDataItem, ReminderId, ReminderRecord};
pub use repo::reminder_repository::ReminderRepository;
pub use repo::reminder_store::{
    InMemoryReminderStore, ReminderStore, RepoError, RepoResult, SqliteReminderStore,
};
pub use repo::result::{
    DataError, OperationResult, ReminderDataSource, DATA_SOURCE_UNAVAILABLE_MESSAGE,
    REMINDER_NOT_FOUND_MESSAGE,
};
pub use viewmodel::reminders_list::RemindersListViewModel;
pub use viewmodel::save_reminder::{
    validate_reminder, PointOfInterest, SaveReminderViewModel, ValidationError,
    REMINDER_SAVED_MESSAGE,
};
pub use viewmodel::{Destination, NavigationCommand, Prompt, UiEvent};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
