//! Overall time budget for one resolution.

use std::time::{Duration, Instant};

/// Point in time after which no new network call is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// No overall limit; only per-call timeouts apply.
    pub fn none() -> Self {
        Self { at: None }
    }

    pub fn after(budget: Duration) -> Self {
        Self {
            at: Some(Instant::now() + budget),
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|d| d.is_zero())
    }

    /// Caps a per-call timeout by the time left. `None` once expired.
    pub fn cap(&self, timeout: Duration) -> Option<Duration> {
        match self.remaining() {
            None => Some(timeout),
            Some(left) if left.is_zero() => None,
            Some(left) => Some(timeout.min(left)),
        }
    }

    /// True if sleeping for `delay` still leaves time for another attempt.
    pub fn allows(&self, delay: Duration) -> bool {
        self.remaining().map_or(true, |left| left > delay)
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
