//! Short-lived response cache keyed by full request identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::result::FetchResult;
use super::transport::Method;

/// (method, URL, headers sorted by lowercased name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
}

impl CacheKey {
    pub(crate) fn new(method: Method, url: &str, headers: &[(String, String)]) -> Self {
        let mut headers: Vec<(String, String)> = headers
            .iter()
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        headers.sort();
        Self {
            method,
            url: url.to_string(),
            headers,
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: Arc<FetchResult>,
    expires_at: Instant,
}

/// Entries are immutable `Arc`s; readers never see a half-written response.
#[derive(Debug, Default)]
pub(crate) struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    pub(crate) fn get(&self, key: &CacheKey) -> Option<Arc<FetchResult>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| Arc::clone(&e.value))
    }

    pub(crate) fn insert(&self, key: CacheKey, value: Arc<FetchResult>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
