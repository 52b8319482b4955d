//! The network seam: one request in, one raw response out.

use std::time::Duration;

/// HTTP method used by the fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
        }
    }
}

/// A fully-specified outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Extra request headers as (name, value).
    pub headers: Vec<(String, String)>,
    /// Upper bound for the whole transfer, already capped by the deadline.
    pub timeout: Duration,
}

/// Status, headers and body as received, after redirects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u32,
    /// Headers of the final response in the redirect chain.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// URL of the final response, if the transport knows it.
    pub final_url: Option<String>,
}

/// Failure to get any HTTP response at all. Non-2xx statuses are not errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Curl(#[from] curl::Error),
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("{0}")]
    Other(String),
}

/// Executes requests. Implementations must be shareable across resolutions.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &Request) -> Result<RawResponse, TransportError>;
}
