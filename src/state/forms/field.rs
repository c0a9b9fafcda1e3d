//! Form field value objects

use super::validators::Rule;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Text content (empty for flags)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Flag(_) => "",
        }
    }

    /// Flag content (false for text)
    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Text(_) => false,
        }
    }

    /// Whether the value counts as "not filled in"
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(b) => !b,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// One entry of a choice field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// How a field is edited and displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text rendered masked
    Secret,
    Multiline,
    Checkbox,
    Choice(Vec<ChoiceOption>),
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: FieldValue,
    pub kind: FieldKind,
    /// 1-based step this field belongs to
    pub step: usize,
    pub rules: Vec<Rule>,
    initial: FieldValue,
}

impl FormField {
    fn new(name: &str, label: &str, kind: FieldKind, value: FieldValue) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            initial: value.clone(),
            value,
            kind,
            step: 1,
            rules: Vec::new(),
        }
    }

    /// Create a new text field
    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text, FieldValue::default())
    }

    /// Create a new masked text field
    pub fn secret(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Secret, FieldValue::default())
    }

    /// Create a new multiline text field
    pub fn multiline(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Multiline, FieldValue::default())
    }

    /// Create a new unchecked checkbox
    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox, FieldValue::Flag(false))
    }

    /// Create a choice field preselecting the first option
    pub fn choice(name: &str, label: &str, options: Vec<ChoiceOption>) -> Self {
        let first = options
            .first()
            .map(|o| FieldValue::from(o.value))
            .unwrap_or_default();
        Self::new(name, label, FieldKind::Choice(options), first)
    }

    /// Set the initial value (also restored by reset)
    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = value.into();
        self.initial = self.value.clone();
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn on_step(mut self, step: usize) -> Self {
        self.step = step.max(1);
        self
    }

    /// Get the text value (returns empty string for checkboxes)
    pub fn as_text(&self) -> &str {
        self.value.as_text()
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::Multiline)
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }

    pub(crate) fn initial_value(&self) -> &FieldValue {
        &self.initial
    }

    /// Value after typing `c`, or `None` if the field does not take text input
    pub fn with_char(&self, c: char) -> Option<FieldValue> {
        match (&self.kind, &self.value) {
            (FieldKind::Text | FieldKind::Secret | FieldKind::Multiline, FieldValue::Text(s)) => {
                let mut next = s.clone();
                next.push(c);
                Some(FieldValue::Text(next))
            }
            _ => None,
        }
    }

    /// Value after a backspace, or `None` if nothing would change
    pub fn without_last_char(&self) -> Option<FieldValue> {
        match (&self.kind, &self.value) {
            (FieldKind::Text | FieldKind::Secret | FieldKind::Multiline, FieldValue::Text(s))
                if !s.is_empty() =>
            {
                let mut next = s.clone();
                next.pop();
                Some(FieldValue::Text(next))
            }
            _ => None,
        }
    }

    /// Value after toggling a checkbox
    pub fn toggled(&self) -> Option<FieldValue> {
        match (&self.kind, &self.value) {
            (FieldKind::Checkbox, FieldValue::Flag(b)) => Some(FieldValue::Flag(!b)),
            _ => None,
        }
    }

    /// Value after moving to the next (or previous) choice, wrapping around
    pub fn cycled(&self, forward: bool) -> Option<FieldValue> {
        let FieldKind::Choice(options) = &self.kind else {
            return None;
        };
        if options.is_empty() {
            return None;
        }
        let current = options
            .iter()
            .position(|o| o.value == self.as_text())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else if current == 0 {
            options.len() - 1
        } else {
            current - 1
        };
        Some(FieldValue::from(options[next].value))
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match (&self.kind, &self.value) {
            (FieldKind::Secret, FieldValue::Text(s)) => "•".repeat(s.chars().count()),
            (FieldKind::Checkbox, value) => {
                let mark = if value.as_flag() { "[x]" } else { "[ ]" };
                format!("{mark} {}", self.label)
            }
            (FieldKind::Choice(options), value) => options
                .iter()
                .find(|o| o.value == value.as_text())
                .map(|o| format!("◀ {} ▶", o.label))
                .unwrap_or_default(),
            (_, value) => value.as_text().to_string(),
        }
    }
}
