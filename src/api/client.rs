//! GraphQL client for the booking platform API
//!
//! Every form submission maps to exactly one mutation. Mutation payloads carry
//! a `success` flag and an optional `message` next to the domain payload;
//! GraphQL-level errors are classified by their `extensions.code`.

use super::error::ApiError;
use super::traits::BookingApi;
use super::types::{
    AcceptInvitationRequest, Address, AuthSession, Booking, CreateAddressRequest,
    CreateBookingRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const LOGIN_MUTATION: &str = r#"mutation Login($input: LoginInput!) {
  login(input: $input) { success message token user { id fullName email role } }
}"#;

const REGISTER_MUTATION: &str = r#"mutation Register($input: RegisterInput!) {
  register(input: $input) { success message token user { id fullName email role } }
}"#;

const REQUEST_PASSWORD_RESET_MUTATION: &str = r#"mutation RequestPasswordReset($input: RequestPasswordResetInput!) {
  requestPasswordReset(input: $input) { success message }
}"#;

const RESET_PASSWORD_MUTATION: &str = r#"mutation ResetPassword($input: ResetPasswordInput!) {
  resetPassword(input: $input) { success message }
}"#;

const ACCEPT_INVITATION_MUTATION: &str = r#"mutation AcceptInvitation($input: AcceptInvitationInput!) {
  acceptInvitation(input: $input) { success message token user { id fullName email role } }
}"#;

const CREATE_ADDRESS_MUTATION: &str = r#"mutation CreateAddress($input: CreateAddressInput!) {
  createAddress(input: $input) { success message address { id label street city postalCode isDefault } }
}"#;

const CREATE_BOOKING_MUTATION: &str = r#"mutation CreateBooking($input: CreateBookingInput!) {
  createBooking(input: $input) { success message booking { id service date timeSlot rooms priceCents notes } }
}"#;

/// Used when a mutation reports `success: false` without a message
const NOT_ACCEPTED_MESSAGE: &str = "The request was not accepted";

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorExtensions {
    code: Option<String>,
    field: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Ack {}

#[derive(Debug, Deserialize)]
struct AddressPayload {
    address: Address,
}

#[derive(Debug, Deserialize)]
struct BookingPayload {
    booking: Booking,
}

/// Client for the platform's GraphQL endpoint
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphqlClient {
    /// Create a client for the given endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("homeservices-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn mutate<V, P>(
        &self,
        query: &str,
        field: &str,
        input: V,
        token: Option<&str>,
    ) -> Result<P, ApiError>
    where
        V: Serialize,
        P: DeserializeOwned,
    {
        tracing::debug!(operation = field, "sending GraphQL mutation");

        let input =
            serde_json::to_value(&input).map_err(|err| ApiError::Unexpected(err.to_string()))?;
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": { "input": input } }));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body: GraphqlResponse = response.json().await.map_err(|err| {
            if status.is_success() {
                ApiError::Unexpected(err.to_string())
            } else {
                ApiError::Network(format!("server responded with {status}"))
            }
        })?;

        let result = decode_response(field, body);
        if let Err(err) = &result {
            tracing::warn!(operation = field, error = %err, "GraphQL mutation failed");
        }
        result
    }
}

#[async_trait]
impl BookingApi for GraphqlClient {
    async fn login(&self, request: LoginRequest) -> Result<AuthSession, ApiError> {
        self.mutate(LOGIN_MUTATION, "login", request, None).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<AuthSession, ApiError> {
        self.mutate(REGISTER_MUTATION, "register", request, None)
            .await
    }

    async fn request_password_reset(&self, request: ForgotPasswordRequest) -> Result<(), ApiError> {
        let _: Ack = self
            .mutate(
                REQUEST_PASSWORD_RESET_MUTATION,
                "requestPasswordReset",
                request,
                None,
            )
            .await?;
        Ok(())
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), ApiError> {
        let _: Ack = self
            .mutate(RESET_PASSWORD_MUTATION, "resetPassword", request, None)
            .await?;
        Ok(())
    }

    async fn accept_invitation(
        &self,
        request: AcceptInvitationRequest,
    ) -> Result<AuthSession, ApiError> {
        self.mutate(ACCEPT_INVITATION_MUTATION, "acceptInvitation", request, None)
            .await
    }

    async fn create_address(
        &self,
        token: &str,
        request: CreateAddressRequest,
    ) -> Result<Address, ApiError> {
        let payload: AddressPayload = self
            .mutate(CREATE_ADDRESS_MUTATION, "createAddress", request, Some(token))
            .await?;
        Ok(payload.address)
    }

    async fn create_booking(
        &self,
        token: &str,
        request: CreateBookingRequest,
    ) -> Result<Booking, ApiError> {
        let payload: BookingPayload = self
            .mutate(CREATE_BOOKING_MUTATION, "createBooking", request, Some(token))
            .await?;
        Ok(payload.booking)
    }
}

/// Extract the payload of `field` from a GraphQL response body
fn decode_response<P: DeserializeOwned>(field: &str, body: GraphqlResponse) -> Result<P, ApiError> {
    if let Some(error) = body.errors.into_iter().next() {
        return Err(classify_error(error));
    }

    let payload = body
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::Unexpected(format!("response is missing `{field}`")))?;

    let envelope: Envelope = serde_json::from_value(payload.clone())
        .map_err(|err| ApiError::Unexpected(err.to_string()))?;
    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| NOT_ACCEPTED_MESSAGE.to_string());
        return Err(ApiError::Rejected(message));
    }

    serde_json::from_value(payload).map_err(|err| ApiError::Unexpected(err.to_string()))
}

/// Map a GraphQL error onto the client error taxonomy
fn classify_error(error: GraphqlError) -> ApiError {
    let extensions = error.extensions.unwrap_or_default();
    match (extensions.code.as_deref(), extensions.field) {
        (Some("EMAIL_TAKEN"), _) => ApiError::field("email", error.message),
        (Some("BAD_USER_INPUT"), Some(field)) => ApiError::field(to_snake_case(&field), error.message),
        _ if error.message.trim().is_empty() => {
            ApiError::Unexpected("server returned an error without a message".to_string())
        }
        _ => ApiError::Rejected(error.message),
    }
}

/// Convert a camelCase server field name to the form's snake_case name
fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn body(value: Value) -> GraphqlResponse {
        serde_json::from_value(value).unwrap()
    }

    mod decode {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_successful_login_payload() {
            let response = body(json!({
                "data": { "login": {
                    "success": true,
                    "message": null,
                    "token": "tok-1",
                    "user": { "id": "u1", "fullName": "Ada", "email": "ada@example.com", "role": "CUSTOMER" }
                }}
            }));
            let session: AuthSession = decode_response("login", response).unwrap();
            assert_eq!(session.token, "tok-1");
            assert_eq!(session.user.email, "ada@example.com");
        }

        #[test]
        fn test_unsuccessful_payload_is_rejected_with_message() {
            let response = body(json!({
                "data": { "login": { "success": false, "message": "Invalid email or password" } }
            }));
            let err = decode_response::<AuthSession>("login", response).unwrap_err();
            assert_eq!(err, ApiError::rejected("Invalid email or password"));
        }

        #[test]
        fn test_unsuccessful_payload_without_message_uses_default() {
            let response = body(json!({ "data": { "resetPassword": { "success": false } } }));
            let err = decode_response::<Ack>("resetPassword", response).unwrap_err();
            assert_eq!(err, ApiError::rejected(NOT_ACCEPTED_MESSAGE));
        }

        #[test]
        fn test_missing_field_is_unexpected() {
            let response = body(json!({ "data": { "somethingElse": {} } }));
            let err = decode_response::<Ack>("resetPassword", response).unwrap_err();
            assert!(matches!(err, ApiError::Unexpected(_)));
        }

        #[test]
        fn test_null_payload_is_unexpected() {
            let response = body(json!({ "data": { "createAddress": null } }));
            let err = decode_response::<AddressPayload>("createAddress", response).unwrap_err();
            assert!(matches!(err, ApiError::Unexpected(_)));
        }

        #[test]
        fn test_ack_accepts_envelope_only() {
            let response = body(json!({
                "data": { "requestPasswordReset": { "success": true, "message": "sent" } }
            }));
            assert!(decode_response::<Ack>("requestPasswordReset", response).is_ok());
        }

        #[test]
        fn test_address_payload() {
            let response = body(json!({
                "data": { "createAddress": { "success": true, "address": {
                    "id": "a1", "label": "Home", "street": "1 Main St",
                    "city": "Springfield", "postalCode": "12345", "isDefault": true
                }}}
            }));
            let payload: AddressPayload = decode_response("createAddress", response).unwrap();
            assert_eq!(payload.address.postal_code, "12345");
            assert!(payload.address.is_default);
        }
    }

    mod classify {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_email_taken_maps_to_email_field() {
            let response = body(json!({
                "errors": [{ "message": "This email is already registered",
                             "extensions": { "code": "EMAIL_TAKEN" } }]
            }));
            let err = decode_response::<AuthSession>("register", response).unwrap_err();
            assert_eq!(
                err,
                ApiError::field("email", "This email is already registered")
            );
        }

        #[test]
        fn test_bad_user_input_field_is_normalized() {
            let response = body(json!({
                "errors": [{ "message": "Unknown service area",
                             "extensions": { "code": "BAD_USER_INPUT", "field": "serviceArea" } }]
            }));
            let err = decode_response::<AuthSession>("register", response).unwrap_err();
            assert_eq!(err, ApiError::field("service_area", "Unknown service area"));
        }

        #[test]
        fn test_bad_user_input_without_field_is_rejected() {
            let response = body(json!({
                "errors": [{ "message": "Bad input", "extensions": { "code": "BAD_USER_INPUT" } }]
            }));
            let err = decode_response::<AuthSession>("register", response).unwrap_err();
            assert_eq!(err, ApiError::rejected("Bad input"));
        }

        #[test]
        fn test_unknown_code_is_rejected() {
            let response = body(json!({
                "errors": [{ "message": "Session expired", "extensions": { "code": "UNAUTHENTICATED" } }]
            }));
            let err = decode_response::<AddressPayload>("createAddress", response).unwrap_err();
            assert_eq!(err, ApiError::rejected("Session expired"));
        }

        #[test]
        fn test_error_without_message_is_unexpected() {
            let response = body(json!({ "errors": [{ "message": "  " }] }));
            let err = decode_response::<AuthSession>("login", response).unwrap_err();
            assert!(matches!(err, ApiError::Unexpected(_)));
        }

        #[test]
        fn test_errors_take_precedence_over_data() {
            let response = body(json!({
                "data": { "login": { "success": true } },
                "errors": [{ "message": "Nope" }]
            }));
            let err = decode_response::<AuthSession>("login", response).unwrap_err();
            assert_eq!(err, ApiError::rejected("Nope"));
        }
    }

    mod snake_case {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_camel_case_conversion() {
            assert_eq!(to_snake_case("serviceArea"), "service_area");
            assert_eq!(to_snake_case("confirmPassword"), "confirm_password");
        }

        #[test]
        fn test_already_snake_case_is_unchanged() {
            assert_eq!(to_snake_case("postal_code"), "postal_code");
            assert_eq!(to_snake_case("email"), "email");
        }
    }

    #[test]
    fn test_new_client_keeps_endpoint() {
        let client = GraphqlClient::new("http://localhost:4000/graphql").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:4000/graphql");
    }
}
