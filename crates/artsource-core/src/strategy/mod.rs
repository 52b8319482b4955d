//! Platform strategies.
//!
//! Every supported platform implements [`SourceStrategy`]; [`Strategy`] is the
//! closed set of them that the [`Registry`] hands out. A strategy instance is
//! scoped to one resolution and memoizes everything it computes.

mod null;
mod registry;
pub mod tumblr;

pub use null::NullStrategy;
pub use registry::Registry;
pub use tumblr::TumblrStrategy;

use crate::bundle::{dedup_strings, MediaBundle, Tag};
use crate::html;
use crate::tags::TagNormalizer;

/// What every platform strategy can answer about its source URL.
pub trait SourceStrategy {
    fn site_name(&self) -> &str;

    /// Best-quality asset URLs for the underlying work.
    fn image_urls(&self) -> &[String];

    /// Reduced-size counterparts of `image_urls`, same length and order.
    fn preview_urls(&self) -> &[String];

    fn page_url(&self) -> Option<String>;
    fn profile_url(&self) -> Option<String>;
    fn artist_name(&self) -> Option<&str>;
    fn work_id(&self) -> Option<&str>;
    fn commentary_title(&self) -> Option<String>;
    fn commentary_body(&self) -> Option<&str>;

    /// Tags as (name, tag page URL), no repeated names, first seen first.
    fn tags(&self) -> &[Tag];

    fn normalize_tag(&self, tag: &str, normalizer: &dyn TagNormalizer) -> String {
        normalizer.normalize(tag)
    }

    /// Canonical URL used as the persistence deduplication key.
    fn normalize_for_source(&self) -> String;

    /// Assembles the output record, evaluating every field once.
    fn bundle(&self, normalizer: &dyn TagNormalizer) -> MediaBundle {
        let image_urls = self.image_urls().to_vec();
        let preview_urls = self.preview_urls().to_vec();
        debug_assert_eq!(image_urls.len(), preview_urls.len());

        let commentary_body = self.commentary_body().map(str::to_string);
        let commentary_text = commentary_body
            .as_deref()
            .map(html::to_plain_text)
            .filter(|t| !t.is_empty());
        let tags = self.tags().to_vec();
        let normalized_tags = dedup_strings(
            tags.iter()
                .map(|t| self.normalize_tag(&t.name, normalizer))
                .filter(|t| !t.is_empty()),
        );

        MediaBundle {
            site_name: self.site_name().to_string(),
            page_url: self.page_url(),
            profile_url: self.profile_url(),
            artist_name: self.artist_name().map(str::to_string),
            work_id: self.work_id().map(str::to_string),
            image_urls,
            preview_urls,
            commentary_title: self.commentary_title(),
            commentary_body,
            commentary_text,
            tags,
            normalized_tags,
            normalized_source: self.normalize_for_source(),
        }
    }
}

/// The strategies this build knows about.
#[derive(Debug)]
pub enum Strategy {
    Tumblr(TumblrStrategy),
    Null(NullStrategy),
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            Strategy::Tumblr($s) => $e,
            Strategy::Null($s) => $e,
        }
    };
}

impl SourceStrategy for Strategy {
    fn site_name(&self) -> &str {
        dispatch!(self, s => s.site_name())
    }

    fn image_urls(&self) -> &[String] {
        dispatch!(self, s => s.image_urls())
    }

    fn preview_urls(&self) -> &[String] {
        dispatch!(self, s => s.preview_urls())
    }

    fn page_url(&self) -> Option<String> {
        dispatch!(self, s => s.page_url())
    }

    fn profile_url(&self) -> Option<String> {
        dispatch!(self, s => s.profile_url())
    }

    fn artist_name(&self) -> Option<&str> {
        dispatch!(self, s => s.artist_name())
    }

    fn work_id(&self) -> Option<&str> {
        dispatch!(self, s => s.work_id())
    }

    fn commentary_title(&self) -> Option<String> {
        dispatch!(self, s => s.commentary_title())
    }

    fn commentary_body(&self) -> Option<&str> {
        dispatch!(self, s => s.commentary_body())
    }

    fn tags(&self) -> &[Tag] {
        dispatch!(self, s => s.tags())
    }

    fn normalize_tag(&self, tag: &str, normalizer: &dyn TagNormalizer) -> String {
        dispatch!(self, s => s.normalize_tag(tag, normalizer))
    }

    fn normalize_for_source(&self) -> String {
        dispatch!(self, s => s.normalize_for_source())
    }
}
