//! The normalized output of one resolution.

use serde::Serialize;
use std::collections::HashSet;

/// A tag name and the platform page listing works with that tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub url: String,
}

/// Everything a resolution found out about one source URL.
///
/// `preview_urls[i]` is always derived from `image_urls[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaBundle {
    pub site_name: String,
    pub page_url: Option<String>,
    pub profile_url: Option<String>,
    pub artist_name: Option<String>,
    pub work_id: Option<String>,
    pub image_urls: Vec<String>,
    pub preview_urls: Vec<String>,
    pub commentary_title: Option<String>,
    pub commentary_body: Option<String>,
    /// Plain-text rendering of `commentary_body`.
    pub commentary_text: Option<String>,
    pub tags: Vec<Tag>,
    /// Tag names passed through the site's pre-transform and the shared normalizer.
    pub normalized_tags: Vec<String>,
    /// Deduplication key for persisting this source.
    pub normalized_source: String,
}

/// Removes tags whose name was already seen; first occurrence wins.
pub fn dedup_tags(tags: impl IntoIterator<Item = Tag>) -> Vec<Tag> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|t| seen.insert(t.name.clone()))
        .collect()
}

/// Removes repeated strings, keeping first-seen order.
pub(crate) fn dedup_strings(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
