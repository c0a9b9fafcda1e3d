//! In-memory booking backend
//!
//! Stands in for the platform API when no endpoint is configured. All data
//! lives in the instance, so every `InMemoryApi` starts from its own state.

use super::error::ApiError;
use super::traits::BookingApi;
use super::types::{
    AcceptInvitationRequest, Address, AuthSession, Booking, CreateAddressRequest,
    CreateBookingRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, User, UserRole,
};
use crate::state::booking;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Seeded demo customer
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "Passw0rd!";
/// Seeded admin invitation
pub const DEMO_INVITATION: &str = "INVITE-DEMO";

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Clone)]
struct Invitation {
    email: String,
}

#[derive(Debug, Default)]
struct Backend {
    /// Accounts keyed by lowercase email
    accounts: HashMap<String, Account>,
    /// Session token -> lowercase email
    sessions: HashMap<String, String>,
    /// Reset code -> lowercase email
    reset_codes: HashMap<String, String>,
    invitations: HashMap<String, Invitation>,
    addresses: HashMap<String, Vec<Address>>,
    bookings: HashMap<String, Vec<Booking>>,
}

impl Backend {
    fn open_session(&mut self, email: &str) -> Option<AuthSession> {
        let account = self.accounts.get(email)?;
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), email.to_string());
        Some(AuthSession {
            user: account.user.clone(),
            token,
        })
    }

    fn create_account(&mut self, full_name: &str, email: &str, password: &str, role: UserRole) {
        let user = User {
            id: Uuid::new_v4().to_string(),
            full_name: full_name.trim().to_string(),
            email: email.to_string(),
            role,
        };
        self.accounts.insert(
            email.to_string(),
            Account {
                user,
                password: password.to_string(),
            },
        );
    }

    fn session_email(&self, token: &str) -> Result<String, ApiError> {
        self.sessions
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::rejected(SESSION_EXPIRED))
    }
}

/// Booking API backed by process memory
pub struct InMemoryApi {
    backend: Mutex<Backend>,
    latency: Duration,
}

impl InMemoryApi {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            backend: Mutex::new(Backend::default()),
            latency: Duration::ZERO,
        }
    }

    /// Create a backend with the demo account and invitation
    pub fn seeded() -> Self {
        let mut backend = Backend::default();
        backend.create_account("Demo Customer", DEMO_EMAIL, DEMO_PASSWORD, UserRole::Customer);
        backend.invitations.insert(
            DEMO_INVITATION.to_string(),
            Invitation {
                email: "admin@example.com".to_string(),
            },
        );
        Self {
            backend: Mutex::new(backend),
            latency: Duration::ZERO,
        }
    }

    /// Delay every response, so the submitting state is visible in the UI
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl BookingApi for InMemoryApi {
    async fn login(&self, request: LoginRequest) -> Result<AuthSession, ApiError> {
        self.simulate_latency().await;
        let email = normalize_email(&request.email);
        let mut backend = self.backend.lock().await;

        let matches = backend
            .accounts
            .get(&email)
            .is_some_and(|account| account.password == request.password);
        if !matches {
            return Err(ApiError::rejected(INVALID_CREDENTIALS));
        }
        backend
            .open_session(&email)
            .ok_or_else(|| ApiError::rejected(INVALID_CREDENTIALS))
    }

    async fn register(&self, request: RegisterRequest) -> Result<AuthSession, ApiError> {
        self.simulate_latency().await;
        let email = normalize_email(&request.email);
        let mut backend = self.backend.lock().await;

        if backend.accounts.contains_key(&email) {
            return Err(ApiError::field("email", "This email is already registered"));
        }
        backend.create_account(&request.full_name, &email, &request.password, UserRole::Customer);
        tracing::info!(email = %email, "customer account created");
        backend
            .open_session(&email)
            .ok_or_else(|| ApiError::Unexpected("account was not stored".to_string()))
    }

    async fn request_password_reset(&self, request: ForgotPasswordRequest) -> Result<(), ApiError> {
        self.simulate_latency().await;
        let email = normalize_email(&request.email);
        let mut backend = self.backend.lock().await;

        // Unknown addresses succeed too, so account existence is not revealed
        if backend.accounts.contains_key(&email) {
            let code = format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000);
            tracing::info!(email = %email, code = %code, "password reset code issued");
            backend.reset_codes.insert(code, email);
        }
        Ok(())
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), ApiError> {
        self.simulate_latency().await;
        let mut backend = self.backend.lock().await;

        let email = backend
            .reset_codes
            .remove(request.reset_code.trim())
            .ok_or_else(|| ApiError::field("reset_code", "Reset code is invalid or has expired"))?;
        if let Some(account) = backend.accounts.get_mut(&email) {
            account.password = request.password;
        }
        backend.sessions.retain(|_, session_email| *session_email != email);
        Ok(())
    }

    async fn accept_invitation(
        &self,
        request: AcceptInvitationRequest,
    ) -> Result<AuthSession, ApiError> {
        self.simulate_latency().await;
        let mut backend = self.backend.lock().await;

        let invitation = backend
            .invitations
            .remove(request.invitation_token.trim())
            .ok_or_else(|| {
                ApiError::field(
                    "invitation_token",
                    "Invitation is invalid or has already been used",
                )
            })?;
        let email = normalize_email(&invitation.email);
        backend.create_account(&request.full_name, &email, &request.password, UserRole::Admin);
        tracing::info!(email = %email, "admin invitation accepted");
        backend
            .open_session(&email)
            .ok_or_else(|| ApiError::Unexpected("account was not stored".to_string()))
    }

    async fn create_address(
        &self,
        token: &str,
        request: CreateAddressRequest,
    ) -> Result<Address, ApiError> {
        self.simulate_latency().await;
        let mut backend = self.backend.lock().await;
        let email = backend.session_email(token)?;

        let addresses = backend.addresses.entry(email).or_default();
        let is_default = request.is_default || addresses.is_empty();
        if is_default {
            addresses.iter_mut().for_each(|a| a.is_default = false);
        }
        let address = Address {
            id: Uuid::new_v4().to_string(),
            label: request.label.trim().to_string(),
            street: request.street.trim().to_string(),
            city: request.city.trim().to_string(),
            postal_code: request.postal_code.trim().to_uppercase(),
            is_default,
        };
        addresses.push(address.clone());
        Ok(address)
    }

    async fn create_booking(
        &self,
        token: &str,
        request: CreateBookingRequest,
    ) -> Result<Booking, ApiError> {
        self.simulate_latency().await;
        let mut backend = self.backend.lock().await;
        let email = backend.session_email(token)?;

        let price_cents = booking::estimate_price_cents(&request.service, request.rooms)
            .ok_or_else(|| ApiError::field("service", "This service is not available"))?;
        if booking::time_slot(&request.time_slot).is_none() {
            return Err(ApiError::field("time_slot", "This time slot is not available"));
        }
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            service: request.service,
            date: request.date,
            time_slot: request.time_slot,
            rooms: request.rooms,
            price_cents,
            notes: request.notes,
        };
        backend.bookings.entry(email).or_default().push(booking.clone());
        Ok(booking)
    }
}
