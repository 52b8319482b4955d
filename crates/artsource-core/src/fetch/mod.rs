//! Cached HTTP fetching.
//!
//! A [`Fetcher`] lives for one resolution. It sends requests through a shared
//! [`Transport`] (libcurl in production, a mock in tests), reuses responses
//! for a caller-chosen TTL keyed by (method, URL, headers), caps every call by the
//! resolution [`Deadline`], and retries transient failures. Non-2xx statuses
//! come back as ordinary [`FetchResult`]s; only failing to get a response at
//! all is an error.

mod cache;
mod curl_transport;
mod deadline;
mod headers;
#[cfg(test)]
pub(crate) mod mock;
mod result;
mod transport;

use std::sync::Arc;
use std::time::Duration;

use cache::{CacheKey, ResponseCache};
use crate::config::HttpConfig;
use crate::retry::{run_with_retry, RetryPolicy};

pub use curl_transport::CurlTransport;
pub use deadline::Deadline;
pub use result::FetchResult;
pub use transport::{Method, RawResponse, Request, Transport, TransportError};
pub(crate) use headers::find_header;

/// Why a fetch produced no response.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("resolution deadline passed before {method} {url}")]
    DeadlineExceeded { method: &'static str, url: String },
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: TransportError,
    },
}

/// Per-resolution HTTP client with a short-TTL response cache.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    retry: RetryPolicy,
    deadline: Deadline,
    cache: ResponseCache,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        http: &HttpConfig,
        retry: RetryPolicy,
        deadline: Deadline,
    ) -> Self {
        Self {
            transport,
            timeout: http.timeout(),
            retry,
            deadline,
            cache: ResponseCache::default(),
        }
    }

    /// GET `url` with extra `headers`, reusing a cached response younger than `ttl`.
    pub fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        ttl: Duration,
    ) -> Result<Arc<FetchResult>, FetchError> {
        let headers: Vec<(String, String)> = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.send(Method::Get, url, headers, ttl)
    }

    /// GET `url` as an HTML page (`Accept: text/html`).
    pub fn get_html(&self, url: &str, ttl: Duration) -> Result<Arc<FetchResult>, FetchError> {
        self.get(url, &[("Accept", "text/html")], ttl)
    }

    /// HEAD `url` and return its status code.
    pub fn head(&self, url: &str, ttl: Duration) -> Result<u32, FetchError> {
        self.send(Method::Head, url, Vec::new(), ttl).map(|r| r.status())
    }

    /// True if `url` answers a HEAD with 2xx. Servers that refuse HEAD
    /// (405/501) are asked again with a cached GET. Failures count as absent.
    pub fn exists(&self, url: &str, ttl: Duration) -> bool {
        let status = match self.head(url, ttl) {
            Ok(405 | 501) => self.get(url, &[], ttl).map(|r| r.status()),
            other => other,
        };
        match status {
            Ok(code) => (200..300).contains(&code),
            Err(e) => {
                tracing::debug!(error = %e, "existence probe failed");
                false
            }
        }
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        headers: Vec<(String, String)>,
        ttl: Duration,
    ) -> Result<Arc<FetchResult>, FetchError> {
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(redact(url)))?;
        let shown = redact_parsed(&parsed);

        let key = CacheKey::new(method, url, &headers);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(method = method.as_str(), url = %shown, "cache hit");
            return Ok(hit);
        }

        let raw = run_with_retry(&self.retry, &self.deadline, || {
            let timeout = self
                .deadline
                .cap(self.timeout)
                .ok_or(TransportError::Timeout)?;
            let request = Request {
                method,
                url: url.to_string(),
                headers: headers.clone(),
                timeout,
            };
            self.transport.execute(&request)
        })
        .map_err(|source| {
            if self.deadline.is_expired() {
                FetchError::DeadlineExceeded {
                    method: method.as_str(),
                    url: shown.clone(),
                }
            } else {
                FetchError::Transport {
                    method: method.as_str(),
                    url: shown.clone(),
                    source,
                }
            }
        })?;

        tracing::debug!(method = method.as_str(), url = %shown, status = raw.status, "fetched");
        let result = Arc::new(FetchResult::new(url, raw));
        self.cache.insert(key, Arc::clone(&result), ttl);
        Ok(result)
    }
}

/// Query parameters whose values never appear in logs or errors.
const SECRET_PARAMS: &[&str] = &["api_key"];

fn redact(url: &str) -> String {
    url::Url::parse(url).map_or_else(|_| url.to_string(), |u| redact_parsed(&u))
}

fn redact_parsed(url: &url::Url) -> String {
    if !url.query_pairs().any(|(k, _)| SECRET_PARAMS.contains(&k.as_ref())) {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if SECRET_PARAMS.contains(&k.as_ref()) {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.into()
}
