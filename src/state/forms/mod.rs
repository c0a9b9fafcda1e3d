//! Form lifecycle: fields, validation, per-form state, step navigation and
//! submission

mod catalog;
mod field;
mod sequencer;
mod snapshot;
mod store;
mod submission;
mod validators;

pub use catalog::{
    accept_invitation_request, address_request, booking_request, forgot_password_request,
    login_request, register_request, reset_password_request, FormDefaults, FormKind, MAX_ROOMS,
};
pub use field::{ChoiceOption, FieldKind, FieldValue, FormField};
pub use sequencer::StepSequencer;
pub use snapshot::FormSnapshot;
pub use store::FormStore;
pub use submission::{Completion, FormController, SubmissionId, SubmissionTicket, SubmitRejected};
pub use validators::{
    password_strength, validate, validate_fields, FieldErrors, PasswordStrength, Rule,
    MIN_PASSWORD_LENGTH,
};
