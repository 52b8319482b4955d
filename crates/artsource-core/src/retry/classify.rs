//! Classify HTTP status and transport errors into retry policy error kinds.

use crate::fetch::TransportError;
use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions. `None` for statuses that
/// are final answers (success, redirects, client errors).
pub fn classify_http_status(code: u32) -> Option<ErrorKind> {
    match code {
        429 | 503 => Some(ErrorKind::Throttled),
        500..=599 => Some(ErrorKind::Http5xx(code as u16)),
        _ => None,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a transport failure into an ErrorKind.
pub fn classify_transport_error(e: &TransportError) -> ErrorKind {
    match e {
        TransportError::Curl(ce) => classify_curl_error(ce),
        TransportError::Timeout => ErrorKind::Timeout,
        TransportError::Connection(_) => ErrorKind::Connection,
        TransportError::BodyTooLarge { .. } | TransportError::Other(_) => ErrorKind::Other,
    }
}
