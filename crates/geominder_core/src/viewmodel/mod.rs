//! View-models driving the reminder list and save screens.
//!
//! # Responsibility
//! - Hold UI-observable state decoupled from any rendering toolkit.
//! - Translate data-source outcomes into transient UI events.
//!
//! # Invariants
//! - View-models receive their data source through the constructor.
//! - Transient events are delivered once: `take_events` drains the queue.

pub mod reminders_list;
pub mod save_reminder;

use std::collections::VecDeque;

/// Localizable prompt shown in a snackbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// The reminder has no title.
    EnterTitle,
    /// The reminder has no selected location.
    SelectLocation,
}

impl Prompt {
    /// Default English text for hosts without their own string resources.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::EnterTitle => "Please enter title",
            Self::SelectLocation => "Please select location",
        }
    }
}

/// Screens a view-model can ask the host to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    SelectLocation,
}

/// Navigation request emitted to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCommand {
    To(Destination),
    Back,
}

/// One-shot UI signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Loading(bool),
    Toast(String),
    SnackBar(String),
    Prompt(Prompt),
    Navigate(NavigationCommand),
}

/// Queue of pending one-shot events shared by every view-model.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    pending: VecDeque<UiEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: UiEvent) {
        self.pending.push_back(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<UiEvent> {
        self.pending.drain(..).collect()
    }
}
