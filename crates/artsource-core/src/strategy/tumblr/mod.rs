//! Tumblr.
//!
//! Identities come from the first of source URL, referer URL, or the post link
//! found on the source's own page that has them. Post content comes from the
//! v2 API when a key is configured; images are upgraded to their largest
//! available size.

mod api;
mod largest;

#[cfg(test)]
mod tests;

pub use api::{fetch_post, posts_url, Photo, PhotoSize, PostKind, PostLookup, TumblrPost};
pub use largest::{find_largest, probe_in_order};

use std::cell::OnceCell;

use super::SourceStrategy;
use crate::bundle::{dedup_tags, Tag};
use crate::config::TumblrConfig;
use crate::error::Degradation;
use crate::fetch::Fetcher;
use crate::html::HtmlDocument;
use crate::tags::TagNormalizer;
use crate::url_model::{tumblr, ParsedUrl, Site};

const SITE_NAME: &str = "Tumblr";

/// Resolution state for one Tumblr source. Each derived value is computed at
/// most once.
#[derive(Debug)]
pub struct TumblrStrategy {
    source: ParsedUrl,
    referer: Option<ParsedUrl>,
    fetcher: Fetcher,
    api_key: Option<String>,
    linked_post: OnceCell<Option<ParsedUrl>>,
    lookup: OnceCell<PostLookup>,
    image_urls: OnceCell<Vec<String>>,
    preview_urls: OnceCell<Vec<String>>,
    tags: OnceCell<Vec<Tag>>,
}

impl TumblrStrategy {
    pub fn matches(source: &ParsedUrl) -> bool {
        source.site == Site::Tumblr
    }

    pub fn new(
        source: ParsedUrl,
        referer: Option<ParsedUrl>,
        fetcher: Fetcher,
        config: &TumblrConfig,
    ) -> Self {
        Self {
            source,
            referer,
            fetcher,
            api_key: config.active_api_key().map(str::to_string),
            linked_post: OnceCell::new(),
            lookup: OnceCell::new(),
            image_urls: OnceCell::new(),
            preview_urls: OnceCell::new(),
            tags: OnceCell::new(),
        }
    }

    /// The API lookup for this source's post, performed on first use.
    pub fn post_lookup(&self) -> &PostLookup {
        self.lookup.get_or_init(|| {
            let Some(api_key) = self.api_key.as_deref() else {
                tracing::debug!(source = %self.source.original_url, "{}", Degradation::PlatformDisabled);
                return PostLookup::NotAttempted(Degradation::PlatformDisabled);
            };
            let (Some(blog), Some(work_id)) = (self.artist_name(), self.work_id()) else {
                tracing::debug!(source = %self.source.original_url, "{}", Degradation::IdentityUnresolved);
                return PostLookup::NotAttempted(Degradation::IdentityUnresolved);
            };
            fetch_post(&self.fetcher, api_key, blog, work_id)
        })
    }

    fn post(&self) -> &TumblrPost {
        self.post_lookup().post()
    }

    /// `field` from the source, else the referer, else the linked post.
    fn first_available<'s, T>(&'s self, field: impl Fn(&'s ParsedUrl) -> Option<T>) -> Option<T> {
        field(&self.source)
            .or_else(|| self.referer.as_ref().and_then(&field))
            .or_else(|| self.linked_post().and_then(&field))
    }

    /// The first `/post/` link on the source's own page.
    fn linked_post(&self) -> Option<&ParsedUrl> {
        self.linked_post
            .get_or_init(|| {
                let page = largest::fetch_page(&self.fetcher, &self.source.original_url)?;
                let href = page.html().find_attr_containing(None, "href", "/post/")?;
                let linked = ParsedUrl::parse(&page.absolutize(href));
                tracing::debug!(
                    source = %self.source.original_url,
                    linked = %linked.original_url,
                    "found post link on source page"
                );
                Some(linked)
            })
            .as_ref()
    }

    fn collect_image_urls(&self) -> Vec<String> {
        if self.source.is_asset() {
            return find_largest(&self.fetcher, &self.source.original_url)
                .into_iter()
                .collect();
        }

        let post = self.post();
        let mut candidates: Vec<String> = match post.kind {
            PostKind::Photo => post
                .photos
                .iter()
                .filter_map(Photo::largest)
                .map(|size| size.url.clone())
                .collect(),
            PostKind::Video => post.video_url.iter().cloned().collect(),
            _ => Vec::new(),
        };
        candidates.extend(self.inline_images());

        candidates
            .iter()
            .filter_map(|candidate| find_largest(&self.fetcher, candidate))
            .collect()
    }

    /// `<img src>` values embedded in the commentary.
    fn inline_images(&self) -> Vec<String> {
        let Some(body) = self.commentary_body() else {
            return Vec::new();
        };
        HtmlDocument::parse(body)
            .attr_values("img", "src")
            .map(str::to_string)
            .collect()
    }
}

impl SourceStrategy for TumblrStrategy {
    fn site_name(&self) -> &str {
        SITE_NAME
    }

    fn image_urls(&self) -> &[String] {
        self.image_urls.get_or_init(|| self.collect_image_urls())
    }

    fn preview_urls(&self) -> &[String] {
        self.preview_urls.get_or_init(|| {
            self.image_urls()
                .iter()
                .map(|url| tumblr::preview_url(url))
                .collect()
        })
    }

    fn page_url(&self) -> Option<String> {
        self.first_available(ParsedUrl::page_url)
    }

    fn profile_url(&self) -> Option<String> {
        self.first_available(ParsedUrl::profile_url)
    }

    fn artist_name(&self) -> Option<&str> {
        self.first_available(|p| p.author_handle.as_deref())
    }

    fn work_id(&self) -> Option<&str> {
        self.first_available(|p| p.work_id.as_deref())
    }

    fn commentary_title(&self) -> Option<String> {
        let post = self.post();
        match post.kind {
            PostKind::Text | PostKind::Link => post.title.clone().filter(|t| !t.is_empty()),
            PostKind::Answer => Some(format!(
                "{} asked: {}",
                post.asking_name.as_deref().unwrap_or_default(),
                post.question.as_deref().unwrap_or_default()
            )),
            _ => None,
        }
    }

    fn commentary_body(&self) -> Option<&str> {
        let post = self.post();
        let body = match post.kind {
            PostKind::Text => &post.body,
            PostKind::Link => &post.description,
            PostKind::Answer => &post.answer,
            PostKind::Photo | PostKind::Video => &post.caption,
            PostKind::Other => return None,
        };
        body.as_deref().filter(|b| !b.is_empty())
    }

    fn tags(&self) -> &[Tag] {
        self.tags.get_or_init(|| {
            dedup_tags(self.post().tags.iter().map(|name| Tag {
                name: name.clone(),
                url: tag_search_url(name),
            }))
        })
    }

    fn normalize_tag(&self, tag: &str, normalizer: &dyn TagNormalizer) -> String {
        normalizer.normalize(&tag.replace('-', "_"))
    }

    fn normalize_for_source(&self) -> String {
        self.source
            .page_url()
            .unwrap_or_else(|| self.source.original_url.clone())
    }
}

/// Tag search page; the tag is form-encoded, so spaces become `+`.
fn tag_search_url(tag: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(tag.as_bytes()).collect();
    format!("https://tumblr.com/tagged/{encoded}")
}
