//! Immutable fetched response with a lazily-parsed HTML view.

use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::OnceLock;

use super::headers::find_header;
use super::transport::RawResponse;
use crate::html::HtmlDocument;

/// One HTTP response. Any status code is representable; callers decide what
/// counts as success.
#[derive(Debug)]
pub struct FetchResult {
    status: u32,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    final_url: String,
    html: OnceLock<HtmlDocument>,
}

impl FetchResult {
    pub fn new(requested_url: &str, raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers,
            body: raw.body,
            final_url: raw.final_url.unwrap_or_else(|| requested_url.to_string()),
            html: OnceLock::new(),
        }
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// URL the response was served from, after redirects.
    pub fn final_url(&self) -> &str {
        &self.final_url
    }

    /// Body parsed as HTML; parsed on first call.
    pub fn html(&self) -> &HtmlDocument {
        self.html.get_or_init(|| HtmlDocument::parse(&self.text()))
    }

    /// Body deserialized into `T`; `None` on any mismatch.
    pub fn json_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Resolves a possibly-relative link found in this page against its URL.
    pub fn absolutize(&self, link: &str) -> String {
        url::Url::parse(&self.final_url)
            .and_then(|base| base.join(link))
            .map(String::from)
            .unwrap_or_else(|_| link.to_string())
    }
}
