//! Picks the best-quality location for a candidate asset URL.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Degradation;
use crate::fetch::{FetchResult, Fetcher};
use crate::url_model::ParsedUrl;

/// How long a fetched HTML page is reused within a resolution.
const PAGE_TTL: Duration = Duration::from_secs(60);
/// How long an existence probe's answer is reused within a resolution.
const PROBE_TTL: Duration = Duration::from_secs(60);

/// Best available URL for `candidate`, or `None` when it should be dropped.
///
/// In order: assets that hide the original behind an HTML page are looked up
/// on that page (dropped when it has no match); assets with known size variants are probed largest first;
/// anything else is already the best we know.
pub fn find_largest(fetcher: &Fetcher, candidate: &str) -> Option<String> {
    let parsed = ParsedUrl::parse(candidate);
    if !parsed.has_url_structure() {
        tracing::debug!(candidate, "dropping candidate without a host");
        return None;
    }

    if let (Some(page), Some(directory)) = (&parsed.full_image_url, &parsed.directory) {
        let needle = format!("/{directory}/");
        let found = fetch_page(fetcher, page).and_then(|html| {
            html.html()
                .find_attr_containing(Some("img"), "src", &needle)
                .map(|src| html.absolutize(src))
        });
        if found.is_none() {
            tracing::debug!(candidate, page = %page, "full-size page had no matching image");
        }
        return found;
    }

    if !parsed.variants.is_empty() {
        let found = probe_in_order(fetcher, &parsed.variants);
        if found.is_none() {
            tracing::debug!(candidate, "{}", Degradation::AssetProbeFailed);
        }
        return found;
    }

    Some(parsed.original_url)
}

/// First variant that exists, probing strictly in priority order.
pub fn probe_in_order(fetcher: &Fetcher, variants: &[String]) -> Option<String> {
    variants.iter().find(|v| fetcher.exists(v, PROBE_TTL)).cloned()
}

/// GETs `url` as HTML; anything but a 200 counts as missing.
pub(super) fn fetch_page(fetcher: &Fetcher, url: &str) -> Option<Arc<FetchResult>> {
    match fetcher.get_html(url, PAGE_TTL) {
        Ok(page) if page.status() == 200 => Some(page),
        Ok(page) => {
            tracing::debug!(url, status = page.status(), "page unavailable");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "page fetch failed");
            None
        }
    }
}
