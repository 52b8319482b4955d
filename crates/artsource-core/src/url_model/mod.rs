//! URL modeling for artwork-hosting sites.
//!
//! Parses raw URL strings into a [`ParsedUrl`]: which site the URL belongs to,
//! what kind of resource it points at, the identities embedded in it, and (for
//! CDN asset URLs) the alternate locations that may hold a bigger copy of the
//! same image. Parsing never touches the network and never fails.

mod path;
pub mod tumblr;

use serde::Serialize;

pub use path::path_segments;

/// Sites with a dedicated parser. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Tumblr,
    Unknown,
}

impl Site {
    /// Human-readable site name used in bundles.
    pub fn name(self) -> &'static str {
        match self {
            Site::Tumblr => "Tumblr",
            Site::Unknown => "Unknown",
        }
    }
}

/// What a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A CDN-hosted image or video file.
    Asset,
    /// A single post (work) page.
    Post,
    /// An artist's blog or profile page.
    Profile,
    Unknown,
}

/// Structured decomposition of a raw URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUrl {
    pub site: Site,
    pub kind: ResourceKind,
    /// Lowercased host, if the input had URL structure at all.
    pub host: Option<String>,
    pub author_handle: Option<String>,
    pub work_id: Option<String>,
    /// Candidate locations for the same image, most likely to exist first.
    /// Existence is only established later by probing.
    pub variants: Vec<String>,
    /// Path token used to pick this asset out of an HTML wrapper page.
    pub directory: Option<String>,
    /// Location of an HTML page wrapping the full-size image, when the site
    /// hides the original behind one.
    pub full_image_url: Option<String>,
    /// Canonical string form of the input.
    pub original_url: String,
}

impl ParsedUrl {
    /// Parses `raw` into a `ParsedUrl`.
    ///
    /// Total: strings that are not http(s) URLs, or URLs on hosts without a
    /// dedicated parser, come back as `ResourceKind::Unknown`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let url = match url::Url::parse(trimmed) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => u,
            _ => return Self::unrecognized(trimmed, None),
        };

        if tumblr::matches(&url) {
            return tumblr::parse(&url);
        }

        Self::unrecognized(url.as_str(), url.host_str().map(str::to_ascii_lowercase))
    }

    pub(crate) fn unrecognized(original_url: &str, host: Option<String>) -> Self {
        Self {
            site: Site::Unknown,
            kind: ResourceKind::Unknown,
            host,
            author_handle: None,
            work_id: None,
            variants: Vec::new(),
            directory: None,
            full_image_url: None,
            original_url: original_url.to_string(),
        }
    }

    pub fn is_asset(&self) -> bool {
        self.kind == ResourceKind::Asset
    }

    /// True if the input was an http(s) URL with a host, recognized or not.
    pub fn has_url_structure(&self) -> bool {
        self.host.is_some()
    }

    /// Canonical post page for the identities in this URL, if both are known.
    pub fn page_url(&self) -> Option<String> {
        match self.site {
            Site::Tumblr => tumblr::page_url(self.author_handle.as_deref()?, self.work_id.as_deref()?),
            Site::Unknown => None,
        }
    }

    /// Canonical profile page for the author in this URL, if known.
    pub fn profile_url(&self) -> Option<String> {
        match self.site {
            Site::Tumblr => tumblr::profile_url(self.author_handle.as_deref()?),
            Site::Unknown => None,
        }
    }
}
