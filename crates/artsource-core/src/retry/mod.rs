//! Retrying transient HTTP failures.
//!
//! Statuses and transport errors are classified into [`ErrorKind`]s;
//! [`RetryPolicy`] turns a kind into a wait, and [`run_with_retry`] drives the
//! loop within the resolution deadline.

mod classify;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status, classify_transport_error};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
