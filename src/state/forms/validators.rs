//! Field validators
//!
//! Validation is pure: the same field, value and snapshot always produce the
//! same result. Rules run in order and the first failure is reported. An empty
//! field that is not required is never checked further.

use super::field::{FieldValue, FormField};
use super::snapshot::FormSnapshot;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Error messages keyed by field name
pub type FieldErrors = BTreeMap<String, String>;

/// Minimum password length accepted everywhere
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single validation rule attached to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Phone,
    MinLength(usize),
    /// Upper case, lower case and a digit
    PasswordComplexity,
    /// Must equal another field of the form
    Matches {
        field: &'static str,
        message: &'static str,
    },
    /// Checkbox must be ticked
    Checked(&'static str),
    PostalCode,
    /// `YYYY-MM-DD`
    Date,
    NumberInRange(u32, u32),
    OneOf(&'static [&'static str]),
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9\s\-().]{7,20}$").expect("valid phone regex"))
}

fn postal_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\- ]{2,9}$").expect("valid postal code regex")
    })
}

impl Rule {
    fn check(&self, field: &FormField, value: &FieldValue, snapshot: &FormSnapshot) -> Option<String> {
        let text = value.as_text().trim();
        let failed = match self {
            Rule::Required => value.is_blank(),
            Rule::Email => !email_pattern().is_match(text),
            Rule::Phone => !phone_pattern().is_match(text),
            Rule::MinLength(min) => value.as_text().chars().count() < *min,
            Rule::PasswordComplexity => {
                let raw = value.as_text();
                !(raw.chars().any(|c| c.is_uppercase())
                    && raw.chars().any(|c| c.is_lowercase())
                    && raw.chars().any(|c| c.is_ascii_digit()))
            }
            Rule::Matches { field: other, .. } => value.as_text() != snapshot.text(other),
            Rule::Checked(_) => !value.as_flag(),
            Rule::PostalCode => !postal_code_pattern().is_match(text),
            Rule::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err(),
            Rule::NumberInRange(min, max) => !text
                .parse::<u32>()
                .is_ok_and(|n| (*min..=*max).contains(&n)),
            Rule::OneOf(options) => !options.iter().any(|option| *option == text),
        };
        failed.then(|| self.message(field))
    }

    fn message(&self, field: &FormField) -> String {
        let label = &field.label;
        match self {
            Rule::Required => format!("{label} is required"),
            Rule::Email => "Email address is invalid".to_string(),
            Rule::Phone => "Phone number is invalid".to_string(),
            Rule::MinLength(min) => format!("{label} must be at least {min} characters"),
            Rule::PasswordComplexity => format!(
                "{label} must include an uppercase letter, a lowercase letter, and a number"
            ),
            Rule::Matches { message, .. } => message.to_string(),
            Rule::Checked(message) => message.to_string(),
            Rule::PostalCode => "Postal code is invalid".to_string(),
            Rule::Date => format!("{label} must be a date like 2026-01-31"),
            Rule::NumberInRange(min, max) => format!("{label} must be between {min} and {max}"),
            Rule::OneOf(_) => format!("Select a valid {}", label.to_lowercase()),
        }
    }
}

/// Validate one field value against its rules
pub fn validate(field: &FormField, value: &FieldValue, snapshot: &FormSnapshot) -> Option<String> {
    if value.is_blank() {
        return field
            .rules
            .iter()
            .find(|rule| matches!(rule, Rule::Required | Rule::Checked(_)))
            .and_then(|rule| rule.check(field, value, snapshot));
    }
    field
        .rules
        .iter()
        .find_map(|rule| rule.check(field, value, snapshot))
}

/// Validate a set of fields against one snapshot
pub fn validate_fields<'a>(
    fields: impl IntoIterator<Item = &'a FormField>,
    snapshot: &FormSnapshot,
) -> FieldErrors {
    fields
        .into_iter()
        .filter_map(|field| {
            validate(field, &field.value, snapshot).map(|message| (field.name.clone(), message))
        })
        .collect()
}

/// Coarse password strength shown while typing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }
}

/// Score a password: one point each for length ≥ 8, length ≥ 12, mixed case,
/// a digit and a symbol
pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let checks = [
        length >= MIN_PASSWORD_LENGTH,
        length >= 12,
        password.chars().any(|c| c.is_lowercase()) && password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
    ];
    match checks.iter().filter(|passed| **passed).count() {
        0 | 1 => PasswordStrength::Weak,
        2 => PasswordStrength::Fair,
        3 => PasswordStrength::Good,
        _ => PasswordStrength::Strong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn email_field() -> FormField {
        FormField::text("email", "Email").with_rules(vec![Rule::Required, Rule::Email])
    }

    fn password_field() -> FormField {
        FormField::secret("password", "Password")
            .with_rules(vec![Rule::Required, Rule::MinLength(MIN_PASSWORD_LENGTH)])
    }

    fn check(field: &FormField, value: &str) -> Option<String> {
        validate(field, &FieldValue::from(value), &FormSnapshot::default())
    }

    mod required {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_required_field() {
            assert_eq!(
                check(&password_field(), ""),
                Some("Password is required".to_string())
            );
        }

        #[test]
        fn test_whitespace_only_counts_as_empty() {
            assert_eq!(
                check(&email_field(), "   "),
                Some("Email is required".to_string())
            );
        }

        #[test]
        fn test_optional_empty_field_skips_format_rules() {
            let field = FormField::text("phone", "Phone").with_rules(vec![Rule::Phone]);
            assert_eq!(check(&field, ""), None);
        }

        #[test]
        fn test_optional_filled_field_is_checked() {
            let field = FormField::text("phone", "Phone").with_rules(vec![Rule::Phone]);
            assert_eq!(check(&field, "call me"), Some("Phone number is invalid".to_string()));
        }
    }

    mod formats {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_invalid_email() {
            assert_eq!(
                check(&email_field(), "not-an-email"),
                Some("Email address is invalid".to_string())
            );
        }

        #[test]
        fn test_valid_email() {
            assert_eq!(check(&email_field(), "jo@example.com"), None);
        }

        #[test]
        fn test_permissive_phone_formats() {
            let field = FormField::text("phone", "Phone").with_rules(vec![Rule::Phone]);
            assert_eq!(check(&field, "+1 (555) 010-0199"), None);
            assert_eq!(check(&field, "555.0100"), None);
            assert!(check(&field, "12").is_some());
        }

        #[test]
        fn test_short_password() {
            assert_eq!(
                check(&password_field(), "abcd123"),
                Some("Password must be at least 8 characters".to_string())
            );
        }

        #[test]
        fn test_password_complexity() {
            let field = FormField::secret("password", "Password")
                .with_rules(vec![Rule::Required, Rule::PasswordComplexity]);
            assert!(check(&field, "alllowercase1").is_some());
            assert!(check(&field, "NoDigitsHere").is_some());
            assert_eq!(check(&field, "Mixed1case"), None);
        }

        #[test]
        fn test_postal_code() {
            let field = FormField::text("postal_code", "Postal code")
                .with_rules(vec![Rule::PostalCode]);
            assert_eq!(check(&field, "94107"), None);
            assert_eq!(check(&field, "SW1A 1AA"), None);
            assert!(check(&field, "#1").is_some());
        }

        #[test]
        fn test_date() {
            let field = FormField::text("date", "Date").with_rules(vec![Rule::Date]);
            assert_eq!(check(&field, "2026-10-20"), None);
            assert_eq!(
                check(&field, "20/10/2026"),
                Some("Date must be a date like 2026-01-31".to_string())
            );
            assert!(check(&field, "2026-02-30").is_some());
        }

        #[test]
        fn test_number_in_range() {
            let field =
                FormField::text("rooms", "Rooms").with_rules(vec![Rule::NumberInRange(1, 10)]);
            assert_eq!(check(&field, "3"), None);
            assert_eq!(
                check(&field, "0"),
                Some("Rooms must be between 1 and 10".to_string())
            );
            assert!(check(&field, "many").is_some());
        }

        #[test]
        fn test_one_of() {
            let field = FormField::text("slot", "Time slot")
                .with_rules(vec![Rule::OneOf(&["morning", "evening"])]);
            assert_eq!(check(&field, "evening"), None);
            assert_eq!(
                check(&field, "noon"),
                Some("Select a valid time slot".to_string())
            );
        }
    }

    mod cross_field {
        use super::*;
        use pretty_assertions::assert_eq;

        fn confirm_field() -> FormField {
            FormField::secret("confirm_password", "Confirm password").with_rules(vec![
                Rule::Required,
                Rule::Matches {
                    field: "password",
                    message: "Passwords do not match",
                },
            ])
        }

        #[test]
        fn test_mismatch_uses_snapshot() {
            let snapshot: FormSnapshot = [("password", "abcd1234")].into_iter().collect();
            let result = validate(&confirm_field(), &FieldValue::from("abcd123"), &snapshot);
            assert_eq!(result, Some("Passwords do not match".to_string()));
        }

        #[test]
        fn test_match_passes() {
            let snapshot: FormSnapshot = [("password", "abcd1234")].into_iter().collect();
            let result = validate(&confirm_field(), &FieldValue::from("abcd1234"), &snapshot);
            assert_eq!(result, None);
        }

        #[test]
        fn test_checked_rule_on_unticked_box() {
            let field = FormField::checkbox("agree_terms", "I agree")
                .with_rules(vec![Rule::Checked("You must accept the terms of service")]);
            let result = validate(&field, &FieldValue::Flag(false), &FormSnapshot::default());
            assert_eq!(
                result,
                Some("You must accept the terms of service".to_string())
            );
            assert_eq!(
                validate(&field, &FieldValue::Flag(true), &FormSnapshot::default()),
                None
            );
        }
    }

    mod properties {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_validation_is_idempotent() {
            let fields = [email_field(), password_field()];
            for value in ["", " ", "not-an-email", "abcd123", "x@y.zz", "longenough"] {
                for field in &fields {
                    let first = check(field, value);
                    let second = check(field, value);
                    assert_eq!(first, second, "field {} value {value:?}", field.name);
                }
            }
        }

        #[test]
        fn test_first_failing_rule_wins() {
            let field = FormField::secret("password", "Password").with_rules(vec![
                Rule::Required,
                Rule::MinLength(8),
                Rule::PasswordComplexity,
            ]);
            assert_eq!(
                check(&field, "abc"),
                Some("Password must be at least 8 characters".to_string())
            );
        }

        #[test]
        fn test_validate_fields_collects_by_name() {
            let mut email = email_field();
            email.value = FieldValue::from("not-an-email");
            let password = password_field();
            let errors = validate_fields([&email, &password], &FormSnapshot::default());
            assert_eq!(errors.len(), 2);
            assert_eq!(errors["email"], "Email address is invalid");
            assert_eq!(errors["password"], "Password is required");
        }
    }

    mod strength {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_strength_levels() {
            assert_eq!(password_strength(""), PasswordStrength::Weak);
            assert_eq!(password_strength("abcdefgh"), PasswordStrength::Weak);
            assert_eq!(password_strength("abcdefg1"), PasswordStrength::Fair);
            assert_eq!(password_strength("Abcdefg1"), PasswordStrength::Good);
            assert_eq!(password_strength("Abcdefg1!xyz"), PasswordStrength::Strong);
        }

        #[test]
        fn test_strength_is_ordered() {
            assert!(PasswordStrength::Weak < PasswordStrength::Strong);
            assert_eq!(PasswordStrength::Good.label(), "Good");
        }
    }
}
