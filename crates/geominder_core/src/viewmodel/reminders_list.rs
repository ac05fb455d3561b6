//! Reminder list view-model.
//!
//! # Invariants
//! - Every successful load replaces the list wholesale.
//! - A failed load leaves the previous list untouched.
//! - `show_no_data` is only recomputed by a successful load.

use crate::model::reminder::ReminderDataItem;
use crate::repo::result::{OperationResult, ReminderDataSource};
use crate::viewmodel::{EventQueue, UiEvent};
use log::{info, warn};

/// Observable state for the reminder list screen.
pub struct RemindersListViewModel<D: ReminderDataSource> {
    data_source: D,
    reminders_list: Vec<ReminderDataItem>,
    show_loading: bool,
    show_no_data: bool,
    events: EventQueue,
}

impl<D: ReminderDataSource> RemindersListViewModel<D> {
    pub fn new(data_source: D) -> Self {
        Self {
            data_source,
            reminders_list: Vec::new(),
            show_loading: false,
            show_no_data: false,
            events: EventQueue::default(),
        }
    }

    /// Loads every reminder from the data source into the display list.
    pub fn load_reminders(&mut self) {
        self.set_loading(true);
        let result = self.data_source.get_reminders();
        self.set_loading(false);

        match result {
            OperationResult::Success(records) => {
                self.reminders_list = records.into_iter().map(ReminderDataItem::from).collect();
                self.show_no_data = self.reminders_list.is_empty();
                info!(
                    "event=reminders_load module=viewmodel status=ok count={}",
                    self.reminders_list.len()
                );
            }
            OperationResult::Error(err) => {
                warn!(
                    "event=reminders_load module=viewmodel status=error error_code={}",
                    err.code()
                );
                self.events.push(UiEvent::SnackBar(err.message()));
            }
        }
    }

    /// Deletes every reminder. Callers reload explicitly afterwards.
    pub fn clear_todos_history(&mut self) {
        if let OperationResult::Error(err) = self.data_source.delete_all_reminders() {
            warn!(
                "event=reminders_clear module=viewmodel status=error error_code={}",
                err.code()
            );
            self.events.push(UiEvent::SnackBar(err.message()));
            return;
        }
        info!("event=reminders_clear module=viewmodel status=ok");
    }

    pub fn reminders_list(&self) -> &[ReminderDataItem] {
        &self.reminders_list
    }

    pub fn show_loading(&self) -> bool {
        self.show_loading
    }

    pub fn show_no_data(&self) -> bool {
        self.show_no_data
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
