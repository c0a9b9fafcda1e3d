//! Request and response types exchanged with the booking API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Signed-in user plus the bearer token for later requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub label: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub service: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub rooms: u32,
    pub price_cents: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub service_area: String,
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub reset_code: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationRequest {
    pub invitation_token: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub label: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub rooms: u32,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_deserializes_from_camel_case() {
        let json = r#"{"id":"u1","fullName":"Ada Lovelace","email":"ada@example.com","role":"ADMIN"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name, "Ada Lovelace");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn test_user_role_defaults_to_customer() {
        let json = r#"{"id":"u1","fullName":"Ada","email":"ada@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Customer);
    }

    #[test]
    fn test_booking_request_serializes_date_as_iso() {
        let request = CreateBookingRequest {
            service: "laundry".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            time_slot: "morning".to_string(),
            rooms: 2,
            notes: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["date"], "2026-10-20");
        assert_eq!(value["timeSlot"], "morning");
    }
}
