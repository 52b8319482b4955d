//! Fallback for URLs no platform strategy claims.

use super::SourceStrategy;
use crate::bundle::Tag;
use crate::url_model::ParsedUrl;

/// Knows nothing beyond the URL itself: the page URL is the source.
#[derive(Debug, Clone)]
pub struct NullStrategy {
    source: ParsedUrl,
    site_name: String,
}

impl NullStrategy {
    pub fn new(source: ParsedUrl) -> Self {
        let site_name = source
            .host
            .clone()
            .unwrap_or_else(|| source.site.name().to_string());
        Self { source, site_name }
    }
}

impl SourceStrategy for NullStrategy {
    fn site_name(&self) -> &str {
        &self.site_name
    }

    fn image_urls(&self) -> &[String] {
        &[]
    }

    fn preview_urls(&self) -> &[String] {
        &[]
    }

    fn page_url(&self) -> Option<String> {
        Some(self.source.original_url.clone())
    }

    fn profile_url(&self) -> Option<String> {
        None
    }

    fn artist_name(&self) -> Option<&str> {
        None
    }

    fn work_id(&self) -> Option<&str> {
        None
    }

    fn commentary_title(&self) -> Option<String> {
        None
    }

    fn commentary_body(&self) -> Option<&str> {
        None
    }

    fn tags(&self) -> &[Tag] {
        &[]
    }

    fn normalize_for_source(&self) -> String {
        self.source.original_url.clone()
    }
}
