//! Booking platform API: the operations forms submit to

mod client;
mod error;
mod memory;
mod traits;
mod types;

pub use client::GraphqlClient;
pub use error::{ApiError, NETWORK_FAILURE_MESSAGE};
pub use memory::{InMemoryApi, DEMO_EMAIL, DEMO_INVITATION, DEMO_PASSWORD};
pub use traits::BookingApi;
pub use types::*;

#[cfg(test)]
pub use traits::MockBookingApi;
