//! Per-form state: values, errors, submission flags and focus

use super::field::{FieldValue, FormField};
use super::snapshot::FormSnapshot;
use super::validators::FieldErrors;

/// State owned by one open form.
///
/// Every value change goes through [`FormStore::set_field`], which also drops
/// the field's error so it is never shown against input the user has since
/// revised.
#[derive(Debug, Clone)]
pub struct FormStore {
    fields: Vec<FormField>,
    errors: FieldErrors,
    submission_error: Option<String>,
    is_submitting: bool,
    active_field: usize,
}

impl FormStore {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            errors: FieldErrors::new(),
            submission_error: None,
            is_submitting: false,
            active_field: 0,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Text value of a field; empty when the field does not exist
    pub fn text(&self, name: &str) -> &str {
        self.field(name).map(FormField::as_text).unwrap_or("")
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Set a field value, clearing that field's error.
    /// Returns false if the form has no such field.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.name == name) else {
            return false;
        };
        field.value = value.into();
        self.errors.remove(name);
        true
    }

    /// Replace the whole error map
    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub(crate) fn insert_error(&mut self, name: &str, message: String) {
        self.errors.insert(name.to_string(), message);
    }

    pub(crate) fn set_submission_error(&mut self, message: Option<String>) {
        self.submission_error = message;
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.is_submitting = submitting;
    }

    /// Restore initial values and clear all errors
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = field.initial_value().clone();
        }
        self.errors.clear();
        self.submission_error = None;
        self.is_submitting = false;
        self.active_field = 0;
    }

    // Focus handling, restricted to the fields of one step

    pub fn active_field_index(&self) -> usize {
        self.active_field
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.fields.get(self.active_field)
    }

    fn step_indices(&self, step: usize) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.step == step)
            .map(|(i, _)| i)
            .collect()
    }

    /// Focus the first field of a step
    pub fn focus_step(&mut self, step: usize) {
        if let Some(first) = self.step_indices(step).first() {
            self.active_field = *first;
        }
    }

    /// Focus the first field that has an error
    pub fn focus_first_error(&mut self) {
        if let Some(index) = self
            .fields
            .iter()
            .position(|f| self.errors.contains_key(&f.name))
        {
            self.active_field = index;
        }
    }

    /// Move focus to the next field of the step, wrapping around
    pub fn next_field(&mut self, step: usize) {
        let indices = self.step_indices(step);
        if indices.is_empty() {
            return;
        }
        let next = match indices.iter().position(|i| *i == self.active_field) {
            Some(pos) => indices[(pos + 1) % indices.len()],
            None => indices[0],
        };
        self.active_field = next;
    }

    /// Move focus to the previous field of the step, wrapping around
    pub fn prev_field(&mut self, step: usize) {
        let indices = self.step_indices(step);
        if indices.is_empty() {
            return;
        }
        let prev = match indices.iter().position(|i| *i == self.active_field) {
            Some(0) | None => indices[indices.len() - 1],
            Some(pos) => indices[pos - 1],
        };
        self.active_field = prev;
    }

    fn edit_active(&mut self, edit: impl FnOnce(&FormField) -> Option<FieldValue>) {
        let Some(field) = self.fields.get(self.active_field) else {
            return;
        };
        if let Some(value) = edit(field) {
            let name = field.name.clone();
            self.set_field(&name, value);
        }
    }

    /// Type a character into the focused field
    pub fn input_char(&mut self, c: char) {
        self.edit_active(|f| f.with_char(c));
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        self.edit_active(FormField::without_last_char);
    }

    /// Toggle the focused checkbox
    pub fn toggle_active(&mut self) {
        self.edit_active(FormField::toggled);
    }

    /// Cycle the focused choice field
    pub fn cycle_active(&mut self, forward: bool) {
        self.edit_active(|f| f.cycled(forward));
    }
}
