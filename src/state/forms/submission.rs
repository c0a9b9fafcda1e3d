//! Form controller: validation, step navigation and the submission lifecycle
//!
//! A submission runs in two phases so the network call can happen off the
//! UI loop:
//!
//! 1. [`FormController::begin_submit`] validates the active step and, if it
//!    passes, marks the form as submitting and hands out a ticket.
//! 2. [`FormController::complete_submit`] applies the outcome. Outcomes for a
//!    ticket that is no longer current (the form was reset, or the submission
//!    cancelled) are reported as [`Completion::Stale`] and change nothing.
//!
//! [`FormController::submit`] runs both phases around an async operation.

use super::field::FormField;
use super::sequencer::StepSequencer;
use super::snapshot::FormSnapshot;
use super::store::FormStore;
use crate::api::{ApiError, NETWORK_FAILURE_MESSAGE};
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Identifies one submission of one form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId {
    form: Uuid,
    seq: u64,
}

/// Everything the async operation needs, handed out by `begin_submit`
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub id: SubmissionId,
    pub snapshot: FormSnapshot,
    pub cancel: CancellationToken,
}

/// Why a submission did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in progress")]
    InFlight,
    #[error("submission is only possible from the final step")]
    NotFinalStep,
    #[error("{0} field(s) failed validation")]
    Invalid(usize),
}

/// Result of applying a finished operation to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The operation succeeded; the caller runs its success handling
    Succeeded(T),
    /// The failure was recorded on the form
    Failed,
    /// The ticket was no longer current; nothing changed
    Stale,
}

#[derive(Debug)]
struct InFlight {
    id: SubmissionId,
    cancel: CancellationToken,
}

/// Lifecycle controller for one open form
#[derive(Debug)]
pub struct FormController {
    id: Uuid,
    store: FormStore,
    sequencer: StepSequencer,
    in_flight: Option<InFlight>,
    next_seq: u64,
}

impl FormController {
    pub fn new(fields: Vec<FormField>) -> Self {
        let total_steps = fields.iter().map(|f| f.step).max().unwrap_or(1);
        let mut store = FormStore::new(fields);
        store.focus_step(1);
        Self {
            id: Uuid::new_v4(),
            store,
            sequencer: StepSequencer::new(total_steps),
            in_flight: None,
            next_seq: 0,
        }
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FormStore {
        &mut self.store
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn current_step(&self) -> usize {
        self.sequencer.current_step()
    }

    pub fn is_submitting(&self) -> bool {
        self.store.is_submitting()
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<super::field::FieldValue>) -> bool {
        self.store.set_field(name, value)
    }

    pub fn next_field(&mut self) {
        let step = self.current_step();
        self.store.next_field(step);
    }

    pub fn prev_field(&mut self) {
        let step = self.current_step();
        self.store.prev_field(step);
    }

    /// Go to the next step if the current one validates
    pub fn advance(&mut self) -> bool {
        if self.store.is_submitting() {
            return false;
        }
        let moved = self.sequencer.advance(&mut self.store);
        if moved {
            self.store.focus_step(self.current_step());
        } else if !self.store.errors().is_empty() {
            self.store.focus_first_error();
        }
        moved
    }

    /// Go back one step
    pub fn retreat(&mut self) -> bool {
        let moved = self.sequencer.retreat();
        if moved {
            self.store.focus_step(self.current_step());
        }
        moved
    }

    /// Start a submission: validate the active step and mark the form busy
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, SubmitRejected> {
        if self.store.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        self.store.set_submission_error(None);
        if !self.sequencer.is_final() {
            return Err(SubmitRejected::NotFinalStep);
        }

        let errors = self.sequencer.validate_current(&self.store);
        let invalid = errors.len();
        self.store.set_errors(errors);
        if invalid > 0 {
            tracing::debug!(invalid, "submission blocked by validation");
            self.store.focus_first_error();
            return Err(SubmitRejected::Invalid(invalid));
        }

        self.next_seq += 1;
        let id = SubmissionId {
            form: self.id,
            seq: self.next_seq,
        };
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            id,
            cancel: cancel.clone(),
        });
        self.store.set_submitting(true);
        tracing::debug!(seq = id.seq, "submission started");

        Ok(SubmissionTicket {
            id,
            snapshot: self.store.snapshot(),
            cancel,
        })
    }

    /// Apply the outcome of a submission started by `begin_submit`.
    ///
    /// `fallback` is shown when the failure carries no usable message.
    pub fn complete_submit<T>(
        &mut self,
        id: SubmissionId,
        result: Result<T, ApiError>,
        fallback: &str,
    ) -> Completion<T> {
        if self.in_flight.as_ref().map(|f| f.id) != Some(id) {
            tracing::debug!(seq = id.seq, "ignoring stale submission result");
            return Completion::Stale;
        }
        self.in_flight = None;
        self.store.set_submitting(false);

        match result {
            Ok(value) => {
                tracing::info!(seq = id.seq, "submission succeeded");
                Completion::Succeeded(value)
            }
            Err(err) => {
                tracing::warn!(seq = id.seq, error = %err, "submission failed");
                self.apply_failure(err, fallback);
                Completion::Failed
            }
        }
    }

    fn apply_failure(&mut self, err: ApiError, fallback: &str) {
        let banner = match err {
            ApiError::Field { field, message } => {
                if let Some(step) = self.store.field(&field).map(|f| f.step) {
                    self.store.insert_error(&field, or_fallback(message, fallback));
                    while self.sequencer.current_step() > step && self.sequencer.retreat() {}
                    self.store.focus_first_error();
                    return;
                }
                or_fallback(message, fallback)
            }
            ApiError::Rejected(message) => or_fallback(message, fallback),
            ApiError::Network(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            ApiError::Cancelled | ApiError::Unexpected(_) => fallback.to_string(),
        };
        self.store.set_submission_error(Some(banner));
    }

    /// Run a whole submission around `operation`
    #[allow(dead_code)]
    pub async fn submit<T, F, Fut>(
        &mut self,
        fallback: &str,
        operation: F,
    ) -> Result<Completion<T>, SubmitRejected>
    where
        F: FnOnce(FormSnapshot, CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let ticket = self.begin_submit()?;
        let cancel = ticket.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = operation(ticket.snapshot, ticket.cancel) => result,
        };
        Ok(self.complete_submit(ticket.id, result, fallback))
    }

    /// Abandon the submission in flight; its result will be ignored
    pub fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.cancel.cancel();
                self.store.set_submitting(false);
                tracing::debug!(seq = in_flight.id.seq, "submission cancelled");
                true
            }
            None => false,
        }
    }

    /// Clear every value and go back to the first step
    pub fn reset(&mut self) {
        self.cancel_in_flight();
        self.store.reset();
        self.sequencer.restart();
        self.store.focus_step(1);
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if let Some(in_flight) = &self.in_flight {
            in_flight.cancel.cancel();
        }
    }
}

fn or_fallback(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
