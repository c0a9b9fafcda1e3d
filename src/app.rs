//! Application state and core logic

use crate::api::{
    Address, ApiError, AuthSession, Booking, BookingApi, GraphqlClient, InMemoryApi,
};
use crate::config::AppConfig;
use crate::platform::SHORTCUT_MODIFIER;
use crate::state::booking::format_slot;
use crate::state::{
    accept_invitation_request, address_request, booking_request, forgot_password_request,
    login_request, register_request, reset_password_request, AppState, Completion, Cooldown,
    FieldKind, FormController, FormDefaults, FormKind, FormSnapshot, MenuEntry, SubmissionId,
    SubmissionTicket, SubmitRejected, View,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Response delay of the offline backend
const DEMO_LATENCY: Duration = Duration::from_millis(600);

/// Payload of a successful submission, per form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Session(AuthSession),
    ResetCodeSent,
    PasswordReset,
    Address(Address),
    Booking(Booking),
}

/// Finished submission sent back to the UI loop
#[derive(Debug)]
pub struct SubmissionEvent {
    pub form: FormKind,
    pub id: SubmissionId,
    pub result: Result<SubmissionOutcome, ApiError>,
}

/// The form currently on screen
#[derive(Debug)]
pub struct ActiveForm {
    pub kind: FormKind,
    pub controller: FormController,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Open form, if the current view is a form
    pub form: Option<ActiveForm>,
    /// Where submissions go, shown in the status bar
    pub backend_label: String,
    api: Arc<dyn BookingApi>,
    config: AppConfig,
    events_tx: UnboundedSender<SubmissionEvent>,
    events_rx: UnboundedReceiver<SubmissionEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance using the configured backend
    pub fn new(config: AppConfig) -> Result<Self> {
        let (api, label): (Arc<dyn BookingApi>, String) = match config.endpoint() {
            Some(url) => {
                let client = GraphqlClient::new(url)?;
                tracing::info!(endpoint = %client.endpoint(), "using GraphQL backend");
                let label = client.endpoint().to_string();
                (Arc::new(client), label)
            }
            None => {
                tracing::info!("no API URL configured, using the offline demo backend");
                (
                    Arc::new(InMemoryApi::seeded().with_latency(DEMO_LATENCY)),
                    "offline demo".to_string(),
                )
            }
        };
        let mut app = Self::with_api(api, config);
        app.backend_label = label;
        Ok(app)
    }

    /// Create an App around an existing API implementation
    pub fn with_api(api: Arc<dyn BookingApi>, config: AppConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = AppState::with_cooldown(Cooldown::new(config.resend_cooldown()));
        Self {
            state,
            form: None,
            backend_label: String::new(),
            api,
            config,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Open a fresh form, replacing (and cancelling) any open one
    pub fn open_form(&mut self, kind: FormKind) {
        if kind.requires_session() && !self.state.is_signed_in() {
            self.push_error(format!("Sign in to use \"{}\".", kind.title()));
            return;
        }
        let defaults = FormDefaults {
            email: self.config.remembered_email().map(str::to_string),
            referral_code: self.config.referral_code.clone(),
        };
        tracing::debug!(form = ?kind, "opening form");
        self.form = Some(ActiveForm {
            kind,
            controller: kind.controller(&defaults),
        });
        self.state.current_view = View::Form(kind);
    }

    /// Close the open form; a submission still running is cancelled
    pub fn close_form(&mut self) {
        self.form = None;
        self.state.current_view = if self.state.is_signed_in() {
            View::Dashboard
        } else {
            View::Menu
        };
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match self.state.current_view {
            View::Menu => self.handle_menu_key(key),
            View::Form(_) => self.handle_form_key(key),
            View::Dashboard => self.handle_dashboard_key(key),
        }
        Ok(())
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_selection_down(),
            KeyCode::Enter => {
                if let Some(entry) = self.state.selected_entry() {
                    self.activate(entry);
                }
            }
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn activate(&mut self, entry: MenuEntry) {
        match entry {
            MenuEntry::Open(kind) => self.open_form(kind),
            MenuEntry::Dashboard => self.state.current_view = View::Dashboard,
            MenuEntry::SignOut => {
                self.state.sign_out();
                self.form = None;
                self.state.current_view = View::Menu;
                self.state.status_message = Some("Signed out".to_string());
            }
            MenuEntry::Quit => self.quit = true,
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('b') => self.open_form(FormKind::Booking),
            KeyCode::Char('a') => self.open_form(FormKind::Address),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_booking_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_booking_selection(false),
            KeyCode::Esc | KeyCode::Char('m') => self.state.current_view = View::Menu,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            self.state.current_view = View::Menu;
            return;
        };
        let controller = &mut form.controller;
        let active_kind = controller.store().active_field().map(|f| f.kind.clone());
        let with_modifier = |c: char| {
            key.code == KeyCode::Char(c)
                && (key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(SHORTCUT_MODIFIER))
        };
        let submit_shortcut = with_modifier('s');
        let clear_shortcut = with_modifier('r');

        match key.code {
            _ if submit_shortcut => self.submit_or_advance(),
            _ if clear_shortcut => {
                controller.reset();
                self.state.status_message = Some("Form cleared".to_string());
            }
            KeyCode::Esc if controller.is_submitting() => {
                controller.cancel_in_flight();
                self.state.status_message = Some("Submission cancelled".to_string());
            }
            KeyCode::Esc => {
                if !controller.retreat() {
                    self.close_form();
                }
            }
            KeyCode::Tab | KeyCode::Down => controller.next_field(),
            KeyCode::BackTab | KeyCode::Up => controller.prev_field(),
            _ if controller.is_submitting() => {}
            KeyCode::Enter if matches!(active_kind, Some(FieldKind::Multiline)) => {
                controller.store_mut().input_char('\n');
            }
            KeyCode::Enter => self.submit_or_advance(),
            KeyCode::Char(' ') if matches!(active_kind, Some(FieldKind::Checkbox)) => {
                controller.store_mut().toggle_active();
            }
            KeyCode::Left if matches!(active_kind, Some(FieldKind::Choice(_))) => {
                controller.store_mut().cycle_active(false);
            }
            KeyCode::Right if matches!(active_kind, Some(FieldKind::Choice(_))) => {
                controller.store_mut().cycle_active(true);
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(
                    KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
                ) =>
            {
                controller.store_mut().input_char(c)
            }
            KeyCode::Backspace => controller.store_mut().backspace(),
            _ => {}
        }
    }

    fn submit_or_advance(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.controller.sequencer().is_final() {
            self.trigger_submit();
        } else {
            form.controller.advance();
        }
    }

    /// Validate the open form and, if valid, start its submission
    pub fn trigger_submit(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let kind = form.kind;

        if kind == FormKind::ForgotPassword {
            let now = Instant::now();
            if self.state.resend_cooldown.is_active(now) {
                self.state.status_message = Some(format!(
                    "You can request another code in {}s",
                    self.state.resend_cooldown.remaining_secs(now)
                ));
                return;
            }
        }

        let token = if kind.requires_session() {
            match self.state.session_token() {
                Some(token) => Some(token.to_string()),
                None => {
                    self.state
                        .push_error("Your session has ended. Please sign in again.");
                    return;
                }
            }
        } else {
            None
        };

        match form.controller.begin_submit() {
            Ok(ticket) => {
                tracing::info!(form = ?kind, "submitting");
                self.spawn_submission(kind, ticket, token);
            }
            Err(SubmitRejected::NotFinalStep) => {
                form.controller.advance();
            }
            Err(rejected) => tracing::debug!(form = ?kind, %rejected, "submission not started"),
        }
    }

    fn spawn_submission(&self, kind: FormKind, ticket: SubmissionTicket, token: Option<String>) {
        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();
        let SubmissionTicket {
            id,
            snapshot,
            cancel,
        } = ticket;

        tokio::spawn(async move {
            // A panic in the operation surfaces as a join error of the inner task
            let work = tokio::spawn(dispatch(api, kind, snapshot, token));
            let abort = work.abort_handle();
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    abort.abort();
                    Err(ApiError::Cancelled)
                }
                joined = work => joined.unwrap_or_else(|err| {
                    tracing::error!(form = ?kind, error = %err, "submission task failed");
                    Err(ApiError::Unexpected(err.to_string()))
                }),
            };
            if events.send(SubmissionEvent { form: kind, id, result }).is_err() {
                tracing::debug!("submission finished after the UI loop stopped");
            }
        });
    }

    /// Apply every finished submission; returns how many were received
    pub fn apply_submission_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_submission(event);
            applied += 1;
        }
        applied
    }

    fn apply_submission(&mut self, event: SubmissionEvent) {
        let Some(form) = self.form.as_mut().filter(|f| f.kind == event.form) else {
            tracing::debug!(form = ?event.form, "dropping result for a closed form");
            return;
        };
        let fallback = event.form.failure_message();
        match form.controller.complete_submit(event.id, event.result, fallback) {
            Completion::Succeeded(outcome) => self.on_success(outcome),
            Completion::Failed | Completion::Stale => {}
        }
    }

    fn on_success(&mut self, outcome: SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Session(session) => {
                self.remember_email(&session.user.email);
                let greeting = format!("Welcome, {}", session.user.full_name);
                self.state.sign_in(session);
                self.form = None;
                self.state.current_view = View::Dashboard;
                self.state.status_message = Some(greeting);
            }
            SubmissionOutcome::ResetCodeSent => {
                self.state.resend_cooldown.start(Instant::now());
                tracing::debug!(
                    secs = self.state.resend_cooldown.period().as_secs(),
                    "resend cooldown started"
                );
                self.open_form(FormKind::ResetPassword);
                self.state.status_message =
                    Some("If that account exists, a reset code is on its way".to_string());
            }
            SubmissionOutcome::PasswordReset => {
                self.open_form(FormKind::Login);
                self.state.status_message =
                    Some("Password updated. You can now sign in.".to_string());
            }
            SubmissionOutcome::Address(address) => {
                if address.is_default {
                    for existing in &mut self.state.addresses {
                        existing.is_default = false;
                    }
                }
                self.state.status_message = Some(format!("Saved address \"{}\"", address.label));
                self.state.addresses.push(address);
                self.close_form();
            }
            SubmissionOutcome::Booking(booking) => {
                self.state.status_message = Some(format!(
                    "Booked for {}",
                    format_slot(booking.date, &booking.time_slot)
                ));
                self.state.bookings.push(booking);
                self.state.booking_selected = self.state.bookings.len() - 1;
                self.close_form();
            }
        }
    }

    fn remember_email(&mut self, email: &str) {
        if !self.config.remembers_email() || self.config.last_email.as_deref() == Some(email) {
            return;
        }
        self.config.last_email = Some(email.to_string());
        if let Err(err) = self.config.save() {
            tracing::warn!(error = %err, "failed to save config");
        }
    }
}

/// Run the API call behind one form
async fn dispatch(
    api: Arc<dyn BookingApi>,
    kind: FormKind,
    snapshot: FormSnapshot,
    token: Option<String>,
) -> Result<SubmissionOutcome, ApiError> {
    let token = token.unwrap_or_default();
    match kind {
        FormKind::Login => api
            .login(login_request(&snapshot))
            .await
            .map(SubmissionOutcome::Session),
        FormKind::Register => api
            .register(register_request(&snapshot))
            .await
            .map(SubmissionOutcome::Session),
        FormKind::ForgotPassword => api
            .request_password_reset(forgot_password_request(&snapshot))
            .await
            .map(|()| SubmissionOutcome::ResetCodeSent),
        FormKind::ResetPassword => api
            .reset_password(reset_password_request(&snapshot))
            .await
            .map(|()| SubmissionOutcome::PasswordReset),
        FormKind::AdminSetup => api
            .accept_invitation(accept_invitation_request(&snapshot))
            .await
            .map(SubmissionOutcome::Session),
        FormKind::Address => api
            .create_address(&token, address_request(&snapshot))
            .await
            .map(SubmissionOutcome::Address),
        FormKind::Booking => {
            let request = booking_request(&snapshot)?;
            api.create_booking(&token, request)
                .await
                .map(SubmissionOutcome::Booking)
        }
    }
}
