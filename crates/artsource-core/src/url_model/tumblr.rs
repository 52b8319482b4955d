//! Tumblr URL conventions: blog and post pages, media CDN assets, and the
//! `_1280` / `_250` filename-suffix convention for previews.

use regex::Regex;
use std::sync::LazyLock;

use super::path::{path_segments, split_extension};
use super::{ParsedUrl, ResourceKind, Site};

const DOMAIN: &str = "tumblr.com";

/// Subdomains of tumblr.com that never name a blog.
const RESERVED_SUBDOMAINS: &[&str] = &[
    "www", "api", "assets", "static", "media", "data", "va", "ve", "vt", "vtt", "secure", "help",
    "support", "staff",
];

/// First path segments on www.tumblr.com that are site pages rather than blogs.
const RESERVED_PATHS: &[&str] = &[
    "blog", "dashboard", "tagged", "search", "explore", "likes", "following", "settings",
    "inbox", "login", "register", "new", "privacy", "policy", "about", "apps", "help", "reblog",
];

/// Old-style image size suffixes, largest first.
pub const IMAGE_SIZES: &[&str] = &["1280", "640", "540", "500h", "500", "400", "250", "100"];

/// Size segment requested for new-style assets. Asked for with `Accept: text/html`,
/// the CDN answers with a page wrapping the full-size original.
const FULL_IMAGE_SIZE: &str = "s2048x3072";

static SIZED_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>\w+)_(?P<size>\d+h?)$").expect("valid regex"));

static DIMENSIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^s\d+x\d+$").expect("valid regex"));

static FULL_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_1280\.(jpg|jpeg|png|gif)$").expect("valid regex"));

static PREVIEW_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_250\.(jpg|jpeg|png|gif)$").expect("valid regex"));

pub(super) fn matches(url: &url::Url) -> bool {
    url.host_str()
        .map(|h| {
            let h = h.to_ascii_lowercase();
            h == DOMAIN || h.ends_with(".tumblr.com")
        })
        .unwrap_or(false)
}

pub(super) fn parse(url: &url::Url) -> ParsedUrl {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let segments = path_segments(url);

    let mut parsed = ParsedUrl::unrecognized(url.as_str(), Some(host.clone()));
    parsed.site = Site::Tumblr;

    if is_media_host(&host) {
        parse_asset(&mut parsed, &host, &segments);
    } else if let Some(blog) = blog_subdomain(&host) {
        parse_blog_page(&mut parsed, blog, &segments);
    } else if host == DOMAIN || host == "www.tumblr.com" {
        parse_site_page(&mut parsed, &segments);
    }
    parsed
}

/// `https://{blog}.tumblr.com/post/{id}`
pub fn page_url(blog: &str, work_id: &str) -> Option<String> {
    Some(format!("https://{blog}.{DOMAIN}/post/{work_id}"))
}

/// `https://{blog}.tumblr.com`
pub fn profile_url(blog: &str) -> Option<String> {
    Some(format!("https://{blog}.{DOMAIN}"))
}

/// Rewrites a `_1280` image to its `_250` preview. Other URLs are returned as is.
pub fn preview_url(url: &str) -> String {
    FULL_SUFFIX_RE.replace(url, "_250.$1").into_owned()
}

/// Rewrites a `_250` preview back to its `_1280` image. Other URLs are returned as is.
pub fn full_url(url: &str) -> String {
    PREVIEW_SUFFIX_RE.replace(url, "_1280.$1").into_owned()
}

fn is_media_host(host: &str) -> bool {
    host == "data.tumblr.com" || host == "media.tumblr.com" || host.ends_with(".media.tumblr.com")
}

fn blog_subdomain(host: &str) -> Option<&str> {
    let sub = host.strip_suffix(".tumblr.com")?;
    if sub.contains('.') || RESERVED_SUBDOMAINS.contains(&sub) || !is_blog_name(sub) {
        return None;
    }
    Some(sub)
}

fn is_blog_name(s: &str) -> bool {
    !s.is_empty()
        && !s.bytes().all(|b| b.is_ascii_digit())
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn is_work_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_blog_page(parsed: &mut ParsedUrl, blog: &str, segments: &[&str]) {
    parsed.author_handle = Some(blog.to_string());
    parsed.kind = match segments {
        ["post" | "image", id, ..] if is_work_id(id) => {
            parsed.work_id = Some(id.to_string());
            ResourceKind::Post
        }
        [] => ResourceKind::Profile,
        _ => ResourceKind::Unknown,
    };
}

fn parse_site_page(parsed: &mut ParsedUrl, segments: &[&str]) {
    let (blog, work) = match segments {
        ["blog", "view", blog, rest @ ..] | ["dashboard", "blog", blog, rest @ ..] => {
            (*blog, rest.first().copied())
        }
        ["blog", blog] if *blog != "view" => (*blog, None),
        [blog, rest @ ..] if !RESERVED_PATHS.contains(blog) => (*blog, rest.first().copied()),
        _ => return,
    };
    if !is_blog_name(blog) {
        return;
    }

    parsed.author_handle = Some(blog.to_ascii_lowercase());
    parsed.kind = match work {
        Some(id) if is_work_id(id) => {
            parsed.work_id = Some(id.to_string());
            ResourceKind::Post
        }
        None => ResourceKind::Profile,
        Some(_) => ResourceKind::Unknown,
    };
}

fn parse_asset(parsed: &mut ParsedUrl, host: &str, segments: &[&str]) {
    let Some((file, dirs)) = segments.split_last() else {
        return;
    };
    let Some((stem, ext)) = split_extension(file) else {
        return;
    };
    parsed.kind = ResourceKind::Asset;
    parsed.directory = dirs.first().map(|d| d.to_string());

    // New style: /{directory}/{sub}/s{W}x{H}/{hash}.{ext}
    if let Some((size, prefix)) = dirs.split_last() {
        if !prefix.is_empty() && DIMENSIONS_RE.is_match(size) {
            parsed.full_image_url = Some(format!(
                "https://{host}/{}/{FULL_IMAGE_SIZE}/{file}",
                prefix.join("/")
            ));
            return;
        }
    }

    // Old style: [/{directory}]/{name}_{size}.{ext}. Unsized files are already originals.
    let Some(caps) = SIZED_FILE_RE.captures(stem) else {
        return;
    };
    let name = &caps["name"];
    let size = &caps["size"];

    if ext.eq_ignore_ascii_case("mp4") {
        parsed.variants = vec![
            format!("https://va.media.tumblr.com/{name}.{ext}"),
            parsed.original_url.clone(),
        ];
        return;
    }

    let dir_prefix = parsed
        .directory
        .as_deref()
        .map(|d| format!("{d}/"))
        .unwrap_or_default();
    let larger = match IMAGE_SIZES.iter().position(|s| *s == size) {
        Some(pos) => &IMAGE_SIZES[..=pos],
        None => IMAGE_SIZES,
    };
    let mut variants: Vec<String> = larger
        .iter()
        .map(|s| format!("https://media.tumblr.com/{dir_prefix}{name}_{s}.{ext}"))
        .collect();
    if !variants.contains(&parsed.original_url) {
        variants.push(parsed.original_url.clone());
    }
    parsed.variants = variants;
}
