//! Geofence regions and "region entered" consumption.
//!
//! # Responsibility
//! - Describe the circular region watched around each reminder.
//! - Turn platform transition events into reminder notifications.
//!
//! # Invariants
//! - A region exists only for reminders with both coordinates.
//! - Only `Enter` transitions produce notifications.
//! - Unknown ids and data-source failures are logged and skipped; one bad id
//!   never blocks the others in the same event.
//!
//! Registration and removal of regions with the platform location service is
//! owned by the host and is not modeled here.

use crate::model::reminder::{coordinate_snippet, ReminderDataItem, ReminderId};
use crate::repo::result::{OperationResult, ReminderDataSource};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Default radius of the region watched around a reminder.
pub const GEOFENCE_RADIUS_IN_METERS: f64 = 100.0;

/// Mean Earth radius (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

const FALLBACK_NOTIFICATION_TITLE: &str = "Location reminder";

/// Circular region keyed by the reminder id it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceRegion {
    pub request_id: ReminderId,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

impl GeofenceRegion {
    /// Builds the region for `item`, or `None` when it has no coordinates.
    pub fn for_reminder(item: &ReminderDataItem, radius_m: f64) -> Option<Self> {
        let (latitude, longitude) = item.coordinates()?;
        Some(Self {
            request_id: item.id.clone(),
            latitude,
            longitude,
            radius_m,
        })
    }

    /// Great-circle distance from the region center, in meters.
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_distance_m(self.latitude, self.longitude, latitude, longitude)
    }

    /// Whether the point lies inside the region (boundary inclusive).
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.distance_to(latitude, longitude) <= self.radius_m
    }
}

/// Haversine distance between two WGS84 coordinates, in meters.
pub fn haversine_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin()
}

/// Returns the ids of every reminder whose region contains the point.
pub fn regions_containing<'a>(
    items: impl IntoIterator<Item = &'a ReminderDataItem>,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
) -> Vec<ReminderId> {
    items
        .into_iter()
        .filter_map(|item| GeofenceRegion::for_reminder(item, radius_m))
        .filter(|region| region.contains(latitude, longitude))
        .map(|region| region.request_id)
        .collect()
}

/// Kind of region transition reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceTransition {
    Enter,
    Exit,
    Dwell,
}

/// Platform event: one transition for one or more regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeofenceEvent {
    pub transition: GeofenceTransition,
    pub request_ids: Vec<ReminderId>,
}

impl GeofenceEvent {
    pub fn entered(request_ids: impl IntoIterator<Item = impl Into<ReminderId>>) -> Self {
        Self {
            transition: GeofenceTransition::Enter,
            request_ids: request_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Payload handed to the host's notification delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderNotification {
    pub title: String,
    pub body: String,
    pub reminder: ReminderDataItem,
}

impl ReminderNotification {
    pub fn for_reminder(reminder: ReminderDataItem) -> Self {
        let title = reminder
            .title
            .clone()
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| FALLBACK_NOTIFICATION_TITLE.to_string());
        let place = reminder
            .location
            .clone()
            .filter(|location| !location.is_empty())
            .or_else(|| {
                reminder
                    .coordinates()
                    .map(|(lat, lng)| coordinate_snippet(lat, lng))
            });
        let body = match place {
            Some(place) => format!("You have arrived at {place}"),
            None => "You have arrived at a reminder location".to_string(),
        };
        Self {
            title,
            body,
            reminder,
        }
    }
}

/// Delivery side of notifications (system tray, FFI callback, ...).
pub trait ReminderNotifier {
    fn notify(&self, notification: &ReminderNotification);
}

impl<F: Fn(&ReminderNotification)> ReminderNotifier for F {
    fn notify(&self, notification: &ReminderNotification) {
        self(notification)
    }
}

/// Consumes geofence transitions by looking reminders up by id.
pub struct GeofenceTransitionHandler<D: ReminderDataSource, N: ReminderNotifier> {
    data_source: D,
    notifier: N,
}

impl<D: ReminderDataSource, N: ReminderNotifier> GeofenceTransitionHandler<D, N> {
    pub fn new(data_source: D, notifier: N) -> Self {
        Self {
            data_source,
            notifier,
        }
    }

    /// Notifies every known reminder in an `Enter` event.
    ///
    /// Returns the notifications that were delivered, in event order.
    pub fn handle(&self, event: &GeofenceEvent) -> Vec<ReminderNotification> {
        if event.transition != GeofenceTransition::Enter {
            info!(
                "event=geofence_transition module=geofence status=skipped transition={:?} count={}",
                event.transition,
                event.request_ids.len()
            );
            return Vec::new();
        }

        let mut delivered = Vec::new();
        for id in &event.request_ids {
            match self.data_source.get_reminder(id) {
                OperationResult::Success(record) => {
                    let notification = ReminderNotification::for_reminder(record.into());
                    self.notifier.notify(&notification);
                    delivered.push(notification);
                }
                OperationResult::Error(err) => {
                    warn!(
                        "event=geofence_transition module=geofence status=error error_code={}",
                        err.code()
                    );
                }
            }
        }

        info!(
            "event=geofence_transition module=geofence status=ok requested={} delivered={}",
            event.request_ids.len(),
            delivered.len()
        );
        delivered
    }
}
