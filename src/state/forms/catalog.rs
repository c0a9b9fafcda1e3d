//! The forms of the application and the requests they produce

use super::field::{ChoiceOption, FormField};
use super::snapshot::FormSnapshot;
use super::submission::FormController;
use super::validators::{Rule, MIN_PASSWORD_LENGTH};
use crate::api::{
    AcceptInvitationRequest, ApiError, CreateAddressRequest, CreateBookingRequest,
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::state::booking::{SERVICES, TIME_SLOTS};
use chrono::NaiveDate;

const TERMS_MESSAGE: &str = "You must accept the terms of service";
const MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const MAX_ROOMS: u32 = 10;

/// Values used to prefill new forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDefaults {
    pub email: Option<String>,
    pub referral_code: Option<String>,
}

/// Every form the client can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    AdminSetup,
    Address,
    Booking,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create an account",
            Self::ForgotPassword => "Forgot password",
            Self::ResetPassword => "Reset password",
            Self::AdminSetup => "Admin setup",
            Self::Address => "New address",
            Self::Booking => "Book a service",
        }
    }

    /// Shown when a failure carries no usable message
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Login => "Login failed. Please check your credentials and try again.",
            Self::Register => "Registration failed. Please try again.",
            Self::ForgotPassword => "Could not send a reset code. Please try again.",
            Self::ResetPassword => "Could not reset your password. Please try again.",
            Self::AdminSetup => "Could not complete admin setup. Please try again.",
            Self::Address => "Could not save the address. Please try again.",
            Self::Booking => "Could not create the booking. Please try again.",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::ForgotPassword => "Send reset code",
            Self::ResetPassword => "Reset password",
            Self::AdminSetup => "Create admin account",
            Self::Address => "Save address",
            Self::Booking => "Book now",
        }
    }

    /// Whether the form can only be submitted while signed in
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Address | Self::Booking)
    }

    pub fn fields(&self, defaults: &FormDefaults) -> Vec<FormField> {
        match self {
            Self::Login => vec![
                email_field().with_value(defaults.email.clone().unwrap_or_default()),
                FormField::secret("password", "Password").with_rules(vec![Rule::Required]),
            ],
            Self::Register => vec![
                FormField::text("full_name", "Full name").with_rules(vec![Rule::Required]),
                email_field(),
                new_password_field(),
                FormField::checkbox("agree_terms", "I accept the terms of service")
                    .with_rules(vec![Rule::Checked(TERMS_MESSAGE)]),
                FormField::text("phone", "Phone")
                    .with_rules(vec![Rule::Required, Rule::Phone])
                    .on_step(2),
                FormField::text("service_area", "Service area")
                    .with_rules(vec![Rule::Required])
                    .on_step(2),
                FormField::text("referral_code", "Referral code")
                    .with_value(defaults.referral_code.clone().unwrap_or_default())
                    .on_step(2),
            ],
            Self::ForgotPassword => vec![email_field()],
            Self::ResetPassword => vec![
                FormField::text("reset_code", "Reset code").with_rules(vec![Rule::Required]),
                new_password_field(),
                confirm_password_field(),
            ],
            Self::AdminSetup => vec![
                FormField::text("invitation_token", "Invitation token")
                    .with_rules(vec![Rule::Required]),
                FormField::text("full_name", "Full name").with_rules(vec![Rule::Required]),
                new_password_field().with_rules(vec![
                    Rule::Required,
                    Rule::MinLength(MIN_PASSWORD_LENGTH),
                    Rule::PasswordComplexity,
                ]),
                confirm_password_field(),
            ],
            Self::Address => vec![
                FormField::text("label", "Label").with_rules(vec![Rule::Required]),
                FormField::text("street", "Street").with_rules(vec![Rule::Required]),
                FormField::text("city", "City").with_rules(vec![Rule::Required]),
                FormField::text("postal_code", "Postal code")
                    .with_rules(vec![Rule::Required, Rule::PostalCode]),
                FormField::checkbox("is_default", "Use as default address"),
            ],
            Self::Booking => vec![
                FormField::choice(
                    "service",
                    "Service",
                    SERVICES
                        .iter()
                        .map(|s| ChoiceOption {
                            value: s.slug,
                            label: s.name,
                        })
                        .collect(),
                )
                .with_rules(vec![Rule::Required]),
                FormField::text("date", "Date").with_rules(vec![Rule::Required, Rule::Date]),
                FormField::choice(
                    "time_slot",
                    "Time slot",
                    TIME_SLOTS
                        .iter()
                        .map(|t| ChoiceOption {
                            value: t.slug,
                            label: t.label,
                        })
                        .collect(),
                )
                .with_rules(vec![Rule::Required]),
                FormField::text("rooms", "Rooms")
                    .with_value("1")
                    .with_rules(vec![Rule::Required, Rule::NumberInRange(1, MAX_ROOMS)]),
                FormField::multiline("notes", "Notes"),
            ],
        }
    }

    /// A fresh controller for this form
    pub fn controller(&self, defaults: &FormDefaults) -> FormController {
        FormController::new(self.fields(defaults))
    }
}

fn email_field() -> FormField {
    FormField::text("email", "Email").with_rules(vec![Rule::Required, Rule::Email])
}

fn new_password_field() -> FormField {
    FormField::secret("password", "Password")
        .with_rules(vec![Rule::Required, Rule::MinLength(MIN_PASSWORD_LENGTH)])
}

fn confirm_password_field() -> FormField {
    FormField::secret("confirm_password", "Confirm password").with_rules(vec![
        Rule::Required,
        Rule::Matches {
            field: "password",
            message: MISMATCH_MESSAGE,
        },
    ])
}

fn trimmed(snapshot: &FormSnapshot, name: &str) -> String {
    snapshot.text(name).trim().to_string()
}

pub fn login_request(snapshot: &FormSnapshot) -> LoginRequest {
    LoginRequest {
        email: trimmed(snapshot, "email"),
        password: snapshot.text("password").to_string(),
    }
}

pub fn register_request(snapshot: &FormSnapshot) -> RegisterRequest {
    RegisterRequest {
        full_name: trimmed(snapshot, "full_name"),
        email: trimmed(snapshot, "email"),
        password: snapshot.text("password").to_string(),
        phone: trimmed(snapshot, "phone"),
        service_area: trimmed(snapshot, "service_area"),
        referral_code: snapshot.optional_text("referral_code"),
    }
}

pub fn forgot_password_request(snapshot: &FormSnapshot) -> ForgotPasswordRequest {
    ForgotPasswordRequest {
        email: trimmed(snapshot, "email"),
    }
}

pub fn reset_password_request(snapshot: &FormSnapshot) -> ResetPasswordRequest {
    ResetPasswordRequest {
        reset_code: trimmed(snapshot, "reset_code"),
        password: snapshot.text("password").to_string(),
    }
}

pub fn accept_invitation_request(snapshot: &FormSnapshot) -> AcceptInvitationRequest {
    AcceptInvitationRequest {
        invitation_token: trimmed(snapshot, "invitation_token"),
        full_name: trimmed(snapshot, "full_name"),
        password: snapshot.text("password").to_string(),
    }
}

pub fn address_request(snapshot: &FormSnapshot) -> CreateAddressRequest {
    CreateAddressRequest {
        label: trimmed(snapshot, "label"),
        street: trimmed(snapshot, "street"),
        city: trimmed(snapshot, "city"),
        postal_code: trimmed(snapshot, "postal_code").to_uppercase(),
        is_default: snapshot.flag("is_default"),
    }
}

/// Booking request from a validated snapshot.
///
/// Parse failures are reported as field errors.
pub fn booking_request(snapshot: &FormSnapshot) -> Result<CreateBookingRequest, ApiError> {
    let date = NaiveDate::parse_from_str(snapshot.text("date").trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::field("date", "Date must be a date like 2026-01-31"))?;
    let rooms = snapshot
        .text("rooms")
        .trim()
        .parse::<u32>()
        .map_err(|_| ApiError::field("rooms", format!("Rooms must be between 1 and {MAX_ROOMS}")))?;
    Ok(CreateBookingRequest {
        service: trimmed(snapshot, "service"),
        date,
        time_slot: trimmed(snapshot, "time_slot"),
        rooms,
        notes: snapshot.optional_text("notes"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::submission::SubmitRejected;
    use pretty_assertions::assert_eq;

    fn open(kind: FormKind) -> FormController {
        kind.controller(&FormDefaults::default())
    }

    mod login {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_invalid_email_and_missing_password() {
            let mut form = open(FormKind::Login);
            form.set_field("email", "not-an-email");
            form.set_field("password", "");

            assert_eq!(form.begin_submit().unwrap_err(), SubmitRejected::Invalid(2));
            assert_eq!(form.store().error("email"), Some("Email address is invalid"));
            assert_eq!(form.store().error("password"), Some("Password is required"));
        }

        #[test]
        fn test_remembered_email_is_prefilled() {
            let defaults = FormDefaults {
                email: Some("jo@example.com".to_string()),
                referral_code: None,
            };
            let form = FormKind::Login.controller(&defaults);
            assert_eq!(form.store().text("email"), "jo@example.com");
        }

        #[test]
        fn test_request_trims_email_not_password() {
            let snapshot: FormSnapshot = [("email", " jo@example.com "), ("password", " pw ")]
                .into_iter()
                .collect();
            let request = login_request(&snapshot);
            assert_eq!(request.email, "jo@example.com");
            assert_eq!(request.password, " pw ");
        }
    }

    mod register {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_has_two_steps() {
            let form = open(FormKind::Register);
            assert_eq!(form.sequencer().total_steps(), 2);
        }

        #[test]
        fn test_valid_first_step_advances_without_second_step_errors() {
            let mut form = open(FormKind::Register);
            form.set_field("full_name", "Jo Doe");
            form.set_field("email", "jo@example.com");
            form.set_field("password", "password1");
            form.set_field("agree_terms", true);

            assert!(form.advance());

            assert_eq!(form.current_step(), 2);
            assert_eq!(form.store().error("service_area"), None);
            assert!(form.store().errors().is_empty());
        }

        #[test]
        fn test_unchecked_terms_block_advance() {
            let mut form = open(FormKind::Register);
            form.set_field("full_name", "Jo Doe");
            form.set_field("email", "jo@example.com");
            form.set_field("password", "password1");

            assert!(!form.advance());
            assert_eq!(form.store().error("agree_terms"), Some(TERMS_MESSAGE));
        }

        #[test]
        fn test_referral_code_prefilled_and_optional() {
            let defaults = FormDefaults {
                email: None,
                referral_code: Some("FRIEND10".to_string()),
            };
            let form = FormKind::Register.controller(&defaults);
            assert_eq!(form.store().text("referral_code"), "FRIEND10");

            let request = register_request(&FormSnapshot::default());
            assert_eq!(request.referral_code, None);
        }
    }

    mod reset_password {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_short_and_mismatched_passwords() {
            let mut form = open(FormKind::ResetPassword);
            form.set_field("reset_code", "123456");
            form.set_field("password", "abcd123");
            form.set_field("confirm_password", "abcd1234");

            assert_eq!(form.begin_submit().unwrap_err(), SubmitRejected::Invalid(2));
            assert_eq!(
                form.store().error("password"),
                Some("Password must be at least 8 characters")
            );
            assert_eq!(form.store().error("confirm_password"), Some(MISMATCH_MESSAGE));
        }
    }

    mod admin_setup {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_requires_complex_password() {
            let mut form = open(FormKind::AdminSetup);
            form.set_field("invitation_token", "INVITE-DEMO");
            form.set_field("full_name", "Ada Admin");
            form.set_field("password", "alllowercase");
            form.set_field("confirm_password", "alllowercase");

            assert!(form.begin_submit().is_err());
            assert_eq!(
                form.store().error("password"),
                Some("Password must include an uppercase letter, a lowercase letter, and a number")
            );
        }
    }

    mod booking {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_defaults_preselect_first_options() {
            let form = open(FormKind::Booking);
            assert_eq!(form.store().text("service"), SERVICES[0].slug);
            assert_eq!(form.store().text("time_slot"), TIME_SLOTS[0].slug);
            assert_eq!(form.store().text("rooms"), "1");
        }

        #[test]
        fn test_rooms_out_of_range() {
            let mut form = open(FormKind::Booking);
            form.set_field("date", "2026-10-20");
            form.set_field("rooms", "11");
            assert!(form.begin_submit().is_err());
            assert_eq!(
                form.store().error("rooms"),
                Some("Rooms must be between 1 and 10")
            );
        }

        #[test]
        fn test_request_from_snapshot() {
            let snapshot: FormSnapshot = [
                ("service", "laundry"),
                ("date", "2026-10-20"),
                ("time_slot", "evening"),
                ("rooms", "3"),
                ("notes", ""),
            ]
            .into_iter()
            .collect();

            let request = booking_request(&snapshot).unwrap();

            assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
            assert_eq!(request.rooms, 3);
            assert_eq!(request.notes, None);
        }

        #[test]
        fn test_unparseable_date_is_field_error() {
            let snapshot: FormSnapshot = [("date", "tomorrow"), ("rooms", "1")].into_iter().collect();
            assert_eq!(
                booking_request(&snapshot),
                Err(ApiError::field("date", "Date must be a date like 2026-01-31"))
            );
        }
    }

    #[test]
    fn test_only_address_and_booking_need_a_session() {
        let needs: Vec<FormKind> = [
            FormKind::Login,
            FormKind::Register,
            FormKind::ForgotPassword,
            FormKind::ResetPassword,
            FormKind::AdminSetup,
            FormKind::Address,
            FormKind::Booking,
        ]
        .into_iter()
        .filter(FormKind::requires_session)
        .collect();
        assert_eq!(needs, vec![FormKind::Address, FormKind::Booking]);
    }

    #[test]
    fn test_address_postal_code_uppercased() {
        let snapshot: FormSnapshot = [("postal_code", "sw1a 1aa")].into_iter().collect();
        assert_eq!(address_request(&snapshot).postal_code, "SW1A 1AA");
    }
}
