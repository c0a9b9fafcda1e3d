//! Application state definitions

use super::cooldown::Cooldown;
use super::forms::FormKind;
use crate::api::{Address, AuthSession, Booking, UserRole};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Menu,
    Form(FormKind),
    Dashboard,
}

/// One selectable line of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Open(FormKind),
    Dashboard,
    SignOut,
    Quit,
}

impl MenuEntry {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open(kind) => kind.title(),
            Self::Dashboard => "Dashboard",
            Self::SignOut => "Sign out",
            Self::Quit => "Quit",
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub menu_selected: usize,

    // Session data
    pub session: Option<AuthSession>,
    pub addresses: Vec<Address>,
    pub bookings: Vec<Booking>,
    pub booking_selected: usize,

    // Feedback
    pub status_message: Option<String>,
    error_queue: VecDeque<String>,

    pub resend_cooldown: Cooldown,
}

impl AppState {
    pub fn with_cooldown(resend_cooldown: Cooldown) -> Self {
        Self {
            resend_cooldown,
            ..Default::default()
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Menu entries for the current session
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        match &self.session {
            None => vec![
                MenuEntry::Open(FormKind::Login),
                MenuEntry::Open(FormKind::Register),
                MenuEntry::Open(FormKind::ForgotPassword),
                MenuEntry::Open(FormKind::ResetPassword),
                MenuEntry::Open(FormKind::AdminSetup),
                MenuEntry::Quit,
            ],
            Some(_) => vec![
                MenuEntry::Dashboard,
                MenuEntry::Open(FormKind::Booking),
                MenuEntry::Open(FormKind::Address),
                MenuEntry::SignOut,
                MenuEntry::Quit,
            ],
        }
    }

    pub fn selected_entry(&self) -> Option<MenuEntry> {
        self.menu_entries().get(self.menu_selected).copied()
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        let max = self.menu_entries().len();
        if max > 0 && self.menu_selected < max - 1 {
            self.menu_selected += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.menu_selected > 0 {
            self.menu_selected -= 1;
        }
    }

    /// Move the dashboard booking selection by one row
    pub fn move_booking_selection(&mut self, down: bool) {
        let max = self.bookings.len();
        if down {
            if max > 0 && self.booking_selected < max - 1 {
                self.booking_selected += 1;
            }
        } else {
            self.booking_selected = self.booking_selected.saturating_sub(1);
        }
    }

    pub fn sign_in(&mut self, session: AuthSession) {
        self.session = Some(session);
        self.clear_session_data();
    }

    pub fn sign_out(&mut self) {
        self.session = None;
        self.clear_session_data();
    }

    fn clear_session_data(&mut self) {
        self.addresses.clear();
        self.bookings.clear();
        self.booking_selected = 0;
        self.menu_selected = 0;
    }

    pub fn is_admin(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.user.role == UserRole::Admin)
    }

    // Error queue, shown one at a time as a modal dialog

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.error_queue.push_back(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    /// Errors queued behind the current one
    pub fn pending_errors(&self) -> usize {
        self.error_queue.len().saturating_sub(1)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }
}
