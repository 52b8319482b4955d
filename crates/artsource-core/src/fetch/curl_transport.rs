//! libcurl-backed transport.
//!
//! One `curl::easy::Easy` handle per request; runs in the current thread, so
//! call from `spawn_blocking` if used from async code.

use std::str;
use std::time::Duration;

use super::headers::parse_header_lines;
use super::transport::{Method, RawResponse, Request, Transport, TransportError};
use crate::config::HttpConfig;

/// Default cap on a response body; pages and API payloads are far smaller.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    user_agent: String,
    max_body_bytes: usize,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            connect_timeout,
            user_agent: user_agent.into(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    /// Responses whose body exceeds `limit` fail with [`TransportError::BodyTooLarge`].
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn from_config(http: &HttpConfig) -> Self {
        Self::new(http.connect_timeout(), http.user_agent.clone())
    }
}

impl Transport for CurlTransport {
    fn execute(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        let mut oversized = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        match request.method {
            Method::Head => easy.nobody(true)?,
            Method::Get => easy.get(true)?,
        }
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(self.connect_timeout.min(request.timeout))?;
        easy.timeout(request.timeout)?;
        easy.useragent(&self.user_agent)?;
        // Empty string: accept every encoding libcurl can decode.
        easy.accept_encoding("")?;

        // Build curl list for custom headers (e.g. "Accept: text/html").
        if !request.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &request.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            // Consuming less than `data.len()` makes libcurl abort the transfer.
            transfer.write_function(|data| {
                if body.len() + data.len() > self.max_body_bytes {
                    oversized = true;
                    return Ok(0);
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        if oversized {
            tracing::debug!(limit = self.max_body_bytes, "response body too large, transfer aborted");
            return Err(TransportError::BodyTooLarge {
                limit: self.max_body_bytes,
            });
        }
        performed?;

        let status = easy.response_code()?;
        let final_url = easy.effective_url()?.map(str::to_string);

        Ok(RawResponse {
            status,
            headers: parse_header_lines(&header_lines),
            body,
            final_url,
        })
    }
}
