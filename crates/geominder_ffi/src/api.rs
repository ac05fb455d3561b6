//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose reminder list/save/clear and geofence entry points to Dart via FRB.
//! - Drive the core view-models so hosts get the same validation and
//!   messages as native screens.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in response envelopes, never as panics.
//! - One repository (and one store worker) is shared per process.

use geominder_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, GeofenceEvent, GeofenceTransitionHandler, OperationResult, ReminderDataItem,
    ReminderDataSource, ReminderNotification, ReminderRepository, RemindersListViewModel,
    SaveReminderViewModel, UiEvent,
};
use log::{error, info};
use once_cell::sync::OnceCell;

static REPOSITORY: OnceCell<ReminderRepository> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Reminder as shown by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderItem {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Place name or coordinate snippet.
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<ReminderDataItem> for ReminderItem {
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

/// List response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderListResponse {
    pub ok: bool,
    /// Reminders in storage order; unchanged-empty on failure.
    pub items: Vec<ReminderItem>,
    /// `true` when a successful load returned nothing.
    pub no_data: bool,
    pub message: String,
}

/// Single-reminder lookup envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderGetResponse {
    pub ok: bool,
    pub item: Option<ReminderItem>,
    /// Stable error code (`not_found|unavailable|storage`) on failure.
    pub error_code: Option<String>,
    pub message: String,
}

/// Generic action response envelope for save/clear flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderActionResponse {
    pub ok: bool,
    /// Id of the saved reminder.
    pub reminder_id: Option<String>,
    /// Toast, snackbar or validation prompt text.
    pub message: String,
}

impl ReminderActionResponse {
    fn success(message: impl Into<String>, reminder_id: Option<String>) -> Self {
        Self {
            ok: true,
            reminder_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            reminder_id: None,
            message: message.into(),
        }
    }
}

/// Notification the host should post after a geofence entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    pub reminder_id: String,
    pub title: String,
    pub body: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<ReminderNotification> for NotificationItem {
    fn from(notification: ReminderNotification) -> Self {
        Self {
            reminder_id: notification.reminder.id,
            title: notification.title,
            body: notification.body,
            latitude: notification.reminder.latitude,
            longitude: notification.reminder.longitude,
        }
    }
}

/// Loads every reminder.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn reminders_list() -> ReminderListResponse {
    match shared_repository() {
        Ok(repo) => list_with(repo),
        Err(message) => ReminderListResponse {
            ok: false,
            items: Vec::new(),
            no_data: false,
            message,
        },
    }
}

/// Looks one reminder up by id. The id is matched exactly, untrimmed.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_get(id: String) -> ReminderGetResponse {
    match shared_repository() {
        Ok(repo) => get_with(repo, &id),
        Err(message) => ReminderGetResponse {
            ok: false,
            item: None,
            error_code: Some("unavailable".to_string()),
            message,
        },
    }
}

/// Validates and saves a new reminder.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Validation failures return `ok=false` with the prompt text.
/// - Returns the generated reminder id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_save(
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> ReminderActionResponse {
    let input = SaveInput {
        title,
        description,
        location,
        latitude,
        longitude,
    };
    match shared_repository() {
        Ok(repo) => save_with(repo, input),
        Err(message) => ReminderActionResponse::failure(message),
    }
}

/// Deletes every reminder.
#[flutter_rust_bridge::frb(sync)]
pub fn reminders_clear() -> ReminderActionResponse {
    match shared_repository() {
        Ok(repo) => clear_with(repo),
        Err(message) => ReminderActionResponse::failure(message),
    }
}

/// Handles a platform geofence entry for `ids`.
///
/// Unknown ids are skipped. Returns the notifications the host should post.
#[flutter_rust_bridge::frb(sync)]
pub fn geofence_entered(ids: Vec<String>) -> Vec<NotificationItem> {
    match shared_repository() {
        Ok(repo) => geofence_entered_with(repo, ids),
        Err(_) => Vec::new(),
    }
}

struct SaveInput {
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn list_with(repo: &ReminderRepository) -> ReminderListResponse {
    let mut view_model = RemindersListViewModel::new(repo);
    view_model.load_reminders();

    if let Some(message) = user_message(view_model.take_events()) {
        return ReminderListResponse {
            ok: false,
            items: Vec::new(),
            no_data: false,
            message,
        };
    }

    let items = view_model
        .reminders_list()
        .iter()
        .cloned()
        .map(ReminderItem::from)
        .collect::<Vec<_>>();
    let message = if view_model.show_no_data() {
        "No reminders.".to_string()
    } else {
        format!("Found {} reminder(s).", items.len())
    };
    ReminderListResponse {
        ok: true,
        items,
        no_data: view_model.show_no_data(),
        message,
    }
}

fn get_with(repo: &ReminderRepository, id: &str) -> ReminderGetResponse {
    match repo.get_reminder(id) {
        OperationResult::Success(record) => ReminderGetResponse {
            ok: true,
            item: Some(ReminderDataItem::from(record).into()),
            error_code: None,
            message: String::new(),
        },
        OperationResult::Error(err) => ReminderGetResponse {
            ok: false,
            item: None,
            error_code: Some(err.code().to_string()),
            message: err.message(),
        },
    }
}

fn save_with(repo: &ReminderRepository, input: SaveInput) -> ReminderActionResponse {
    let mut view_model = SaveReminderViewModel::new(repo);
    view_model.set_title(input.title);
    view_model.set_description(input.description);
    view_model.set_location_label(input.location);
    view_model.set_coordinates(input.latitude, input.longitude);

    let item = view_model.current_item();
    let reminder_id = item.id.clone();
    let saved = view_model.save_reminder(item);
    let message = user_message(view_model.take_events()).unwrap_or_default();

    if saved {
        ReminderActionResponse::success(message, Some(reminder_id))
    } else {
        ReminderActionResponse::failure(message)
    }
}

fn clear_with(repo: &ReminderRepository) -> ReminderActionResponse {
    let mut view_model = RemindersListViewModel::new(repo);
    view_model.clear_todos_history();
    match user_message(view_model.take_events()) {
        Some(message) => ReminderActionResponse::failure(message),
        None => ReminderActionResponse::success("Reminders cleared.", None),
    }
}

fn geofence_entered_with(repo: &ReminderRepository, ids: Vec<String>) -> Vec<NotificationItem> {
    let handler = GeofenceTransitionHandler::new(repo, |_: &ReminderNotification| {});
    handler
        .handle(&GeofenceEvent::entered(ids))
        .into_iter()
        .map(NotificationItem::from)
        .collect()
}

/// Returns the text of the last toast, snackbar or prompt, if any.
fn user_message(events: Vec<UiEvent>) -> Option<String> {
    events.into_iter().rev().find_map(|event| match event {
        UiEvent::Toast(message) | UiEvent::SnackBar(message) => Some(message),
        UiEvent::Prompt(prompt) => Some(prompt.default_text().to_string()),
        UiEvent::Loading(_) | UiEvent::Navigate(_) => None,
    })
}

fn shared_repository() -> Result<&'static ReminderRepository, String> {
    REPOSITORY.get_or_try_init(|| {
        let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
        let repo = ReminderRepository::open(config.db_path.clone()).map_err(|err| {
            error!("event=ffi_repo_open module=ffi status=error error={err}");
            format!("reminder DB open failed: {err}")
        })?;
        info!(
            "event=ffi_repo_open module=ffi status=ok db_path={}",
            config.db_path.display()
        );
        Ok(repo)
    })
}

#[cfg(test)]
mod tests {
    use super::{
        clear_with, core_version, geofence_entered_with, get_with, init_logging, list_with, ping,
        save_with, SaveInput,
    };
    use geominder_core::{
        ReminderDataSource, ReminderRecord, ReminderRepository, REMINDER_NOT_FOUND_MESSAGE,
        REMINDER_SAVED_MESSAGE,
    };

    fn input(title: Option<&str>, location: Option<&str>) -> SaveInput {
        SaveInput {
            title: title.map(str::to_string),
            description: Some("testDescription1".to_string()),
            location: location.map(str::to_string),
            latitude: Some(37.422),
            longitude: Some(-122.0841),
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn save_then_list_and_get_round_trip() {
        let repo = ReminderRepository::in_memory().expect("repo should start");

        let saved = save_with(&repo, input(Some("test1"), Some("Googleplex")));
        assert!(saved.ok, "{}", saved.message);
        assert_eq!(saved.message, REMINDER_SAVED_MESSAGE);
        let id = saved.reminder_id.expect("save should return reminder_id");

        let listed = list_with(&repo);
        assert!(listed.ok);
        assert!(!listed.no_data);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id, id);

        let fetched = get_with(&repo, &id);
        assert!(fetched.ok);
        assert_eq!(
            fetched.item.and_then(|item| item.location),
            Some("Googleplex".to_string())
        );
    }

    #[test]
    fn save_without_title_returns_prompt() {
        let repo = ReminderRepository::in_memory().expect("repo should start");

        let response = save_with(&repo, input(None, Some("Googleplex")));

        assert!(!response.ok);
        assert_eq!(response.message, "Please enter title");
        assert!(list_with(&repo).no_data);
    }

    #[test]
    fn unknown_id_reports_not_found() {
        let repo = ReminderRepository::in_memory().expect("repo should start");

        let response = get_with(&repo, "missing");

        assert!(!response.ok);
        assert_eq!(response.error_code.as_deref(), Some("not_found"));
        assert_eq!(response.message, REMINDER_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn ids_are_matched_exactly() {
        let repo = ReminderRepository::in_memory().expect("repo should start");
        assert!(repo
            .save_reminder(ReminderRecord::with_id(" sp", "padded"))
            .is_success());

        let exact = get_with(&repo, " sp");
        assert!(exact.ok, "{}", exact.message);
        assert_eq!(exact.item.map(|item| item.id), Some(" sp".to_string()));
        assert_eq!(
            get_with(&repo, "sp").error_code.as_deref(),
            Some("not_found")
        );
    }

    #[test]
    fn forced_failure_is_reported_in_envelopes() {
        let repo = ReminderRepository::in_memory().expect("repo should start");
        repo.set_return_error(true);

        assert!(!list_with(&repo).ok);
        assert!(!clear_with(&repo).ok);
        assert!(!save_with(&repo, input(Some("t"), Some("l"))).ok);
    }

    #[test]
    fn clear_then_geofence_entry_finds_nothing() {
        let repo = ReminderRepository::in_memory().expect("repo should start");
        let id = save_with(&repo, input(Some("test1"), Some("Googleplex")))
            .reminder_id
            .expect("save should return reminder_id");

        let notifications = geofence_entered_with(&repo, vec![id.clone()]);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].body, "You have arrived at Googleplex");

        assert!(clear_with(&repo).ok);
        assert!(geofence_entered_with(&repo, vec![id]).is_empty());
    }
}
