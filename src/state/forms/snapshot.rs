//! Point-in-time copy of every field value in a form

use super::field::FieldValue;
use std::collections::BTreeMap;

/// All field values of a form, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    values: BTreeMap<String, FieldValue>,
}

impl FormSnapshot {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text value of a field; empty when missing
    pub fn text(&self, name: &str) -> &str {
        self.get(name).map(FieldValue::as_text).unwrap_or("")
    }

    /// Trimmed text value, `None` when blank or missing
    pub fn optional_text(&self, name: &str) -> Option<String> {
        let value = self.text(name).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Flag value of a field; false when missing
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::as_flag)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_kind() {
        let snapshot: FormSnapshot = [
            ("email", FieldValue::from("a@b.co")),
            ("agree_terms", FieldValue::Flag(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(snapshot.text("email"), "a@b.co");
        assert!(snapshot.flag("agree_terms"));
        assert_eq!(snapshot.get("phone"), None);
    }

    #[test]
    fn test_missing_fields_have_neutral_values() {
        let snapshot = FormSnapshot::default();
        assert_eq!(snapshot.text("email"), "");
        assert!(!snapshot.flag("agree_terms"));
        assert_eq!(snapshot.optional_text("notes"), None);
    }

    #[test]
    fn test_optional_text_trims() {
        let snapshot: FormSnapshot = [("notes", "  ring twice ")].into_iter().collect();
        assert_eq!(snapshot.optional_text("notes"), Some("ring twice".to_string()));
    }
}
