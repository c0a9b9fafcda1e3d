//! Trait abstraction for the booking API to enable mocking in tests

use super::error::ApiError;
use super::types::{
    AcceptInvitationRequest, Address, AuthSession, Booking, CreateAddressRequest,
    CreateBookingRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use async_trait::async_trait;

/// Operations the forms submit to, one call per submission
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Sign in with email and password
    async fn login(&self, request: LoginRequest) -> Result<AuthSession, ApiError>;

    /// Create a customer account and sign it in
    async fn register(&self, request: RegisterRequest) -> Result<AuthSession, ApiError>;

    /// Ask for a password reset code to be sent to an email address
    async fn request_password_reset(&self, request: ForgotPasswordRequest) -> Result<(), ApiError>;

    /// Set a new password using a reset code
    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), ApiError>;

    /// Accept an admin invitation, creating the admin account
    async fn accept_invitation(
        &self,
        request: AcceptInvitationRequest,
    ) -> Result<AuthSession, ApiError>;

    /// Save a service address for the signed-in user
    async fn create_address(
        &self,
        token: &str,
        request: CreateAddressRequest,
    ) -> Result<Address, ApiError>;

    /// Book a service visit for the signed-in user
    async fn create_booking(
        &self,
        token: &str,
        request: CreateBookingRequest,
    ) -> Result<Booking, ApiError>;
}
