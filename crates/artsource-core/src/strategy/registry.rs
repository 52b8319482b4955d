//! Maps a source URL to the strategy that handles it.

use std::sync::Arc;

use super::{NullStrategy, Strategy, TumblrStrategy};
use crate::config::{Config, HttpConfig, TumblrConfig};
use crate::fetch::{CurlTransport, Deadline, Fetcher, Transport};
use crate::retry::RetryPolicy;
use crate::tags::{DefaultTagNormalizer, TagNormalizer};
use crate::url_model::ParsedUrl;

/// Shared, immutable resolution context. Cheap to share across threads; every
/// strategy it hands out gets its own [`Fetcher`] and deadline.
#[derive(Clone)]
pub struct Registry {
    http: HttpConfig,
    retry: RetryPolicy,
    tumblr: TumblrConfig,
    transport: Arc<dyn Transport>,
    normalizer: Arc<dyn TagNormalizer>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("http", &self.http)
            .field("retry", &self.retry)
            .field("tumblr_enabled", &self.tumblr.active_api_key().is_some())
            .finish_non_exhaustive()
    }
}

impl Registry {
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            http: config.http.clone(),
            retry: RetryPolicy::from_config(config.retry.as_ref()),
            tumblr: config.tumblr.clone(),
            transport,
            normalizer: Arc::new(DefaultTagNormalizer),
        }
    }

    /// Registry backed by libcurl.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(CurlTransport::from_config(&config.http)))
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn TagNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn normalizer(&self) -> &dyn TagNormalizer {
        self.normalizer.as_ref()
    }

    /// Strategy for `source`. Dispatch looks at the source only; the referer
    /// is handed to the strategy as a fallback identity source.
    pub fn resolver_for(&self, source: &str, referer: Option<&str>) -> Strategy {
        self.strategy_for(ParsedUrl::parse(source), referer.map(ParsedUrl::parse))
    }

    pub(crate) fn strategy_for(&self, source: ParsedUrl, referer: Option<ParsedUrl>) -> Strategy {
        if TumblrStrategy::matches(&source) {
            return Strategy::Tumblr(TumblrStrategy::new(
                source,
                referer,
                self.new_fetcher(),
                &self.tumblr,
            ));
        }
        Strategy::Null(NullStrategy::new(source))
    }

    fn new_fetcher(&self) -> Fetcher {
        let deadline = self
            .http
            .resolution_deadline()
            .map_or_else(Deadline::none, Deadline::after);
        Fetcher::new(Arc::clone(&self.transport), &self.http, self.retry, deadline)
    }
}
