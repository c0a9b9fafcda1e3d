//! Step tracking for forms spread over several screens

use super::store::FormStore;
use super::validators::{validate_fields, FieldErrors};

/// Current position in a multi-step form, always in `1..=total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequencer {
    current: usize,
    total: usize,
}

impl StepSequencer {
    pub fn new(total_steps: usize) -> Self {
        Self {
            current: 1,
            total: total_steps.max(1),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn total_steps(&self) -> usize {
        self.total
    }

    pub fn is_final(&self) -> bool {
        self.current == self.total
    }

    /// Errors for the fields of the current step only
    pub fn validate_current(&self, store: &FormStore) -> FieldErrors {
        let snapshot = store.snapshot();
        validate_fields(
            store.fields().iter().filter(|f| f.step == self.current),
            &snapshot,
        )
    }

    /// Move one step forward if the current step's fields are valid.
    ///
    /// On failure the step's errors are stored and the position is unchanged.
    /// Returns false on the final step, where submitting takes over.
    pub fn advance(&mut self, store: &mut FormStore) -> bool {
        if self.is_final() {
            return false;
        }
        let errors = self.validate_current(store);
        let valid = errors.is_empty();
        store.set_errors(errors);
        if valid {
            self.current += 1;
        }
        valid
    }

    /// Move one step back. Never validates and keeps every value.
    pub fn retreat(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self) {
        self.current = 1;
    }
}
