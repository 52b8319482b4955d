//! Retry loop: run a request until it succeeds, gets a final answer, or the
//! policy (or the resolution deadline) says stop.

use super::classify::{classify_http_status, classify_transport_error};
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use crate::fetch::{find_header, Deadline, RawResponse, TransportError};
use std::time::Duration;

/// Runs `f` until it yields a non-retryable outcome.
///
/// Throttled and 5xx responses are retried like transport errors; when
/// retries run out the last response (or error) is returned as is. No retry
/// is attempted if the backoff would outlive `deadline`.
pub fn run_with_retry<F>(
    policy: &RetryPolicy,
    deadline: &Deadline,
    mut f: F,
) -> Result<RawResponse, TransportError>
where
    F: FnMut() -> Result<RawResponse, TransportError>,
{
    let mut attempt = 1u32;
    loop {
        let outcome = f();
        let (kind, hint) = match &outcome {
            Ok(resp) => match classify_http_status(resp.status) {
                Some(kind) => (kind, retry_after(resp)),
                None => return outcome,
            },
            Err(e) => (classify_transport_error(e), None),
        };
        match decide(policy, deadline, attempt, kind, hint) {
            RetryDecision::NoRetry => return outcome,
            RetryDecision::RetryAfter(d) => {
                tracing::debug!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying request");
                std::thread::sleep(d);
                attempt += 1;
            }
        }
    }
}

/// `Retry-After` in delta-seconds form; HTTP dates are ignored.
fn retry_after(resp: &RawResponse) -> Option<Duration> {
    find_header(&resp.headers, "retry-after")?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn decide(
    policy: &RetryPolicy,
    deadline: &Deadline,
    attempt: u32,
    kind: ErrorKind,
    hint: Option<Duration>,
) -> RetryDecision {
    match policy.decide(attempt, kind, hint) {
        RetryDecision::RetryAfter(d) if deadline.allows(d) => RetryDecision::RetryAfter(d),
        _ => RetryDecision::NoRetry,
    }
}
