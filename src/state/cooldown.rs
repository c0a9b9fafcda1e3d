//! Resend cooldown for the forgot-password form

use std::time::{Duration, Instant};

/// Blocks an action for a fixed period after it last ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    period: Duration,
    started: Option<Instant>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            started: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
    }

    /// Time left before the action is allowed again
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let started = self.started?;
        let elapsed = now.saturating_duration_since(started);
        self.period
            .checked_sub(elapsed)
            .filter(|left| !left.is_zero())
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.remaining(now).is_some()
    }

    /// Whole seconds left, rounded up, for display
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        self.remaining(now)
            .map(|left| left.as_millis().div_ceil(1000) as u64)
            .unwrap_or(0)
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
