//! Application state module

mod app_state;
pub mod booking;
mod cooldown;
mod forms;

pub use app_state::*;
pub use cooldown::Cooldown;
pub use forms::*;
