//! Tumblr v2 API: post lookup by blog and id.

use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::Degradation;
use crate::fetch::{FetchError, Fetcher};

const API_BASE: &str = "https://api.tumblr.com/v2/blog";
/// How long a post lookup is reused within a resolution.
const API_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Link,
    Answer,
    Photo,
    Video,
    #[default]
    #[serde(other)]
    Other,
}

/// The subset of a post the strategy reads. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TumblrPost {
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub title: Option<String>,
    pub body: Option<String>,
    pub description: Option<String>,
    pub caption: Option<String>,
    pub asking_name: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub video_url: Option<String>,
    pub photos: Vec<Photo>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Photo {
    pub original_size: Option<PhotoSize>,
    pub alt_sizes: Vec<PhotoSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhotoSize {
    pub url: String,
    pub width: u64,
    pub height: u64,
}

impl PhotoSize {
    fn area(&self) -> u64 {
        self.width.saturating_mul(self.height)
    }
}

impl Photo {
    /// The size with the greatest area; the first listed wins ties.
    pub fn largest(&self) -> Option<&PhotoSize> {
        self.original_size
            .iter()
            .chain(&self.alt_sizes)
            .filter(|s| !s.url.is_empty())
            .rev()
            .max_by_key(|s| s.area())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    response: ResponseBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseBody {
    posts: Vec<TumblrPost>,
}

/// Outcome of looking up the post behind a source.
#[derive(Debug, Clone, PartialEq)]
pub enum PostLookup {
    /// No request was made.
    NotAttempted(Degradation),
    /// The request failed, returned non-200, or could not be decoded.
    Unavailable,
    /// The API answered but listed no posts.
    Empty,
    Found(Box<TumblrPost>),
}

static EMPTY_POST: LazyLock<TumblrPost> = LazyLock::new(TumblrPost::default);

impl PostLookup {
    /// The found post, or an empty one so field access never branches.
    pub fn post(&self) -> &TumblrPost {
        match self {
            PostLookup::Found(post) => post.as_ref(),
            _ => &*EMPTY_POST,
        }
    }
}

/// `GET /v2/blog/{blog}/posts?id={id}&api_key={key}`
pub fn posts_url(blog: &str, work_id: &str, api_key: &str) -> Option<String> {
    url::Url::parse_with_params(
        &format!("{API_BASE}/{blog}/posts"),
        &[("id", work_id), ("api_key", api_key)],
    )
    .ok()
    .map(String::from)
}

/// Looks up one post. Every failure degrades to [`PostLookup::Unavailable`].
pub fn fetch_post(fetcher: &Fetcher, api_key: &str, blog: &str, work_id: &str) -> PostLookup {
    let Some(url) = posts_url(blog, work_id, api_key) else {
        return PostLookup::Unavailable;
    };

    let response = match fetcher.get(&url, &[], API_TTL) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                blog,
                work_id,
                error = %describe(&e),
                "{}", Degradation::ApiUnavailable
            );
            return PostLookup::Unavailable;
        }
    };

    if response.status() != 200 {
        tracing::warn!(blog, work_id, status = response.status(), "{}", Degradation::ApiUnavailable);
        return PostLookup::Unavailable;
    }

    let Some(envelope) = response.json_as::<Envelope>() else {
        tracing::warn!(blog, work_id, "tumblr api returned an undecodable body");
        return PostLookup::Unavailable;
    };

    match envelope.response.posts.into_iter().next() {
        Some(post) => PostLookup::Found(Box::new(post)),
        None => {
            tracing::debug!(blog, work_id, "tumblr api listed no posts");
            PostLookup::Empty
        }
    }
}

fn describe(e: &FetchError) -> String {
    match e {
        FetchError::Transport { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}
