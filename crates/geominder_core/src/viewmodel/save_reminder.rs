//! Save-reminder view-model.
//!
//! # Responsibility
//! - Hold the fields of one edit session, fed by the editor and map picker.
//! - Validate and persist the reminder, then ask the host to navigate back.
//!
//! # Invariants
//! - Invalid input never reaches the data source.
//! - Title is validated before location; only the first failure is signaled.
//! - `on_clear` leaves every editor field absent.

use crate::model::reminder::{coordinate_snippet, ReminderDataItem};
use crate::repo::result::{OperationResult, ReminderDataSource};
use crate::viewmodel::{Destination, EventQueue, NavigationCommand, Prompt, UiEvent};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Toast text shown after a successful save.
pub const REMINDER_SAVED_MESSAGE: &str = "Reminder Saved !";

/// Point of interest picked on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub place_id: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Reason a reminder was rejected before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingTitle,
    MissingLocation,
}

impl ValidationError {
    /// Prompt the UI shows for this failure.
    pub fn prompt(self) -> Prompt {
        match self {
            Self::MissingTitle => Prompt::EnterTitle,
            Self::MissingLocation => Prompt::SelectLocation,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "reminder title is missing"),
            Self::MissingLocation => write!(f, "reminder location is missing"),
        }
    }
}

impl Error for ValidationError {}

/// Checks the fields a reminder needs before it may be stored.
pub fn validate_reminder(item: &ReminderDataItem) -> Result<(), ValidationError> {
    if is_null_or_empty(item.title.as_deref()) {
        return Err(ValidationError::MissingTitle);
    }
    if is_null_or_empty(item.location.as_deref()) {
        return Err(ValidationError::MissingLocation);
    }
    Ok(())
}

/// Observable state for the save-reminder screen.
pub struct SaveReminderViewModel<D: ReminderDataSource> {
    data_source: D,
    reminder_title: Option<String>,
    reminder_description: Option<String>,
    reminder_selected_location_str: Option<String>,
    selected_poi: Option<PointOfInterest>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    show_loading: bool,
    events: EventQueue,
}

impl<D: ReminderDataSource> SaveReminderViewModel<D> {
    pub fn new(data_source: D) -> Self {
        Self {
            data_source,
            reminder_title: None,
            reminder_description: None,
            reminder_selected_location_str: None,
            selected_poi: None,
            latitude: None,
            longitude: None,
            show_loading: false,
            events: EventQueue::default(),
        }
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.reminder_title = title;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.reminder_description = description;
    }

    pub fn set_location_label(&mut self, label: Option<String>) {
        self.reminder_selected_location_str = label;
    }

    pub fn set_coordinates(&mut self, latitude: Option<f64>, longitude: Option<f64>) {
        self.latitude = latitude;
        self.longitude = longitude;
    }

    /// Applies a POI chosen on the map: its name becomes the location label.
    pub fn select_poi(&mut self, poi: PointOfInterest) {
        self.latitude = Some(poi.latitude);
        self.longitude = Some(poi.longitude);
        self.reminder_selected_location_str = Some(poi.name.clone());
        self.selected_poi = Some(poi);
    }

    /// Applies a bare map point; the label is a coordinate snippet.
    pub fn select_map_point(&mut self, latitude: f64, longitude: f64) {
        self.selected_poi = None;
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.reminder_selected_location_str = Some(coordinate_snippet(latitude, longitude));
    }

    /// Asks the host to open the location picker.
    pub fn open_location_picker(&mut self) {
        self.events
            .push(UiEvent::Navigate(NavigationCommand::To(Destination::SelectLocation)));
    }

    /// Builds a display item (with a fresh id) from the current editor fields.
    pub fn current_item(&self) -> ReminderDataItem {
        ReminderDataItem::new(
            self.reminder_title.clone(),
            self.reminder_description.clone(),
            self.reminder_selected_location_str.clone(),
            self.latitude,
            self.longitude,
        )
    }

    /// Returns `true` when `item` may be saved; otherwise emits a prompt.
    pub fn validate_entered_data(&mut self, item: &ReminderDataItem) -> bool {
        match validate_reminder(item) {
            Ok(()) => true,
            Err(err) => {
                info!(
                    "event=reminder_validate module=viewmodel status=rejected reason={}",
                    validation_code(err)
                );
                self.events.push(UiEvent::Prompt(err.prompt()));
                false
            }
        }
    }

    /// Validates and persists `item`, then navigates back on success.
    ///
    /// Returns whether the reminder was stored.
    pub fn save_reminder(&mut self, item: ReminderDataItem) -> bool {
        if !self.validate_entered_data(&item) {
            return false;
        }

        self.set_loading(true);
        let result = self.data_source.save_reminder(item.into());
        self.set_loading(false);

        match result {
            OperationResult::Success(()) => {
                info!("event=reminder_save module=viewmodel status=ok");
                self.events
                    .push(UiEvent::Toast(REMINDER_SAVED_MESSAGE.to_string()));
                self.events.push(UiEvent::Navigate(NavigationCommand::Back));
                true
            }
            OperationResult::Error(err) => {
                warn!(
                    "event=reminder_save module=viewmodel status=error error_code={}",
                    err.code()
                );
                self.events.push(UiEvent::SnackBar(err.message()));
                false
            }
        }
    }

    /// Saves the reminder described by the current editor fields.
    pub fn validate_and_save_reminder(&mut self) -> bool {
        let item = self.current_item();
        self.save_reminder(item)
    }

    /// Resets every editor field so the next session starts empty.
    pub fn on_clear(&mut self) {
        self.reminder_title = None;
        self.reminder_description = None;
        self.reminder_selected_location_str = None;
        self.selected_poi = None;
        self.latitude = None;
        self.longitude = None;
    }

    pub fn reminder_title(&self) -> Option<&str> {
        self.reminder_title.as_deref()
    }

    pub fn reminder_description(&self) -> Option<&str> {
        self.reminder_description.as_deref()
    }

    pub fn reminder_selected_location_str(&self) -> Option<&str> {
        self.reminder_selected_location_str.as_deref()
    }

    pub fn selected_poi(&self) -> Option<&PointOfInterest> {
        self.selected_poi.as_ref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn show_loading(&self) -> bool {
        self.show_loading
    }

    /// Drains pending one-shot events in emission order.
    pub fn take_events(&mut self) -> Vec<UiEvent> {
        self.events.drain()
    }

    fn set_loading(&mut self, loading: bool) {
        self.show_loading = loading;
        self.events.push(UiEvent::Loading(loading));
    }
}

fn is_null_or_empty(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

fn validation_code(err: ValidationError) -> &'static str {
    match err {
        ValidationError::MissingTitle => "missing_title",
        ValidationError::MissingLocation => "missing_location",
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_reminder, ValidationError};
    use crate::model::reminder::ReminderDataItem;

    fn item(title: Option<&str>, location: Option<&str>) -> ReminderDataItem {
        ReminderDataItem::new(
            title.map(str::to_string),
            Some("testDescription1".to_string()),
            location.map(str::to_string),
            Some(0.0),
            Some(0.0),
        )
    }

    #[test]
    fn title_is_checked_before_location() {
        assert_eq!(
            validate_reminder(&item(None, None)),
            Err(ValidationError::MissingTitle)
        );
        assert_eq!(
            validate_reminder(&item(Some(""), Some("testLocation1"))),
            Err(ValidationError::MissingTitle)
        );
        assert_eq!(
            validate_reminder(&item(Some("test1"), Some(""))),
            Err(ValidationError::MissingLocation)
        );
        assert_eq!(validate_reminder(&item(Some("test1"), Some("here"))), Ok(()));
    }

    #[test]
    fn whitespace_title_counts_as_content() {
        assert_eq!(validate_reminder(&item(Some(" "), Some("here"))), Ok(()));
    }
}
