use std::time::Duration;

use crate::config::RetryConfig;

/// Why an attempt did not produce a final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timed out.
    Timeout,
    /// 429 or 503; the server may say how long to wait.
    Throttled,
    /// Connection refused or reset, DNS failure, empty reply.
    Connection,
    /// Any other 5xx.
    Http5xx(u16),
    /// Not worth retrying (bad URL, TLS setup, local errors).
    Other,
}

impl ErrorKind {
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Capped exponential backoff shared by every request of a resolution.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts per request, the first one included.
    pub max_attempts: u32,
    /// Wait after the first failed attempt; doubles on each further failure.
    pub base_delay: Duration,
    /// Ceiling for any single wait, server hints included.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let cfg = RetryConfig::default();
        Self::from_config(Some(&cfg))
    }
}

impl RetryPolicy {
    /// Policy from the optional `[retry]` config section; defaults when absent.
    pub fn from_config(cfg: Option<&RetryConfig>) -> Self {
        let Some(c) = cfg else {
            return Self::default();
        };
        Self {
            max_attempts: c.max_attempts.max(1),
            base_delay: Duration::try_from_secs_f64(c.base_delay_secs).unwrap_or(Duration::ZERO),
            max_delay: Duration::from_secs(c.max_delay_secs),
        }
    }

    /// Wait before attempt `attempt + 1`, ignoring any server hint.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
    }

    /// Whether to try again after attempt number `attempt` (1-based) failed
    /// with `kind`. A `Retry-After` hint on throttled responses replaces the
    /// computed backoff, still capped by `max_delay`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind, hint: Option<Duration>) -> RetryDecision {
        if attempt >= self.max_attempts || !kind.is_transient() {
            return RetryDecision::NoRetry;
        }
        let delay = match (kind, hint) {
            (ErrorKind::Throttled, Some(hint)) => hint.min(self.max_delay),
            _ => self.backoff(attempt),
        };
        RetryDecision::RetryAfter(delay)
    }
}
