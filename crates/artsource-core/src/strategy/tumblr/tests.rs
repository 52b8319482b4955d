use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::config::HttpConfig;
use crate::fetch::mock::MockTransport;
use crate::fetch::{Deadline, Method, Transport};
use crate::retry::RetryPolicy;
use crate::tags::DefaultTagNormalizer;

const KEY: &str = "test-key";

fn fetcher(mock: &Arc<MockTransport>) -> Fetcher {
    let transport: Arc<dyn Transport> = mock.clone();
    let retry = RetryPolicy {
        max_attempts: 1,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(1),
    };
    Fetcher::new(transport, &HttpConfig::default(), retry, Deadline::none())
}

fn config(enabled: bool) -> TumblrConfig {
    TumblrConfig {
        enabled,
        api_key: Some(KEY.to_string()),
    }
}

fn strategy(mock: &Arc<MockTransport>, source: &str, referer: Option<&str>, api: bool) -> TumblrStrategy {
    TumblrStrategy::new(
        ParsedUrl::parse(source),
        referer.map(ParsedUrl::parse),
        fetcher(mock),
        &config(api),
    )
}

fn api_url(blog: &str, id: &str) -> String {
    format!("https://api.tumblr.com/v2/blog/{blog}/posts?id={id}&api_key={KEY}")
}

fn route_post(mock: &MockTransport, blog: &str, id: &str, post: &str) {
    let body = format!(r#"{{"meta":{{"status":200}},"response":{{"posts":[{post}]}}}}"#);
    mock.route_get(&api_url(blog, id), 200, &body);
}

#[test]
fn asset_probe_returns_first_existing_variant() {
    let mock = Arc::new(MockTransport::new());
    let v1 = "https://media.tumblr.com/abc/tumblr_xyz_1280.jpg";
    let v2 = "https://media.tumblr.com/abc/tumblr_xyz_640.jpg";
    mock.route_head(v2, 200);
    let s = strategy(&mock, "https://64.media.tumblr.com/abc/tumblr_xyz_500.jpg", None, true);

    assert_eq!(s.image_urls(), [v2.to_string()]);
    assert_eq!(s.preview_urls(), [v2.to_string()]);
    assert_eq!(mock.count(Method::Head, v1), 1);
    assert_eq!(mock.count(Method::Head, v2), 1);
    assert_eq!(mock.count(Method::Head, "https://media.tumblr.com/abc/tumblr_xyz_540.jpg"), 0);
}

#[test]
fn probe_priority_beats_later_variants() {
    let mock = Arc::new(MockTransport::new());
    let v1 = "https://media.tumblr.com/abc/tumblr_xyz_1280.jpg";
    let v2 = "https://media.tumblr.com/abc/tumblr_xyz_640.jpg";
    mock.route_head(v1, 200);
    mock.route_head(v2, 200);
    let f = fetcher(&mock);

    assert_eq!(
        find_largest(&f, "https://64.media.tumblr.com/abc/tumblr_xyz_500.jpg").as_deref(),
        Some(v1)
    );
    assert_eq!(mock.count(Method::Head, v2), 0);
}

#[test]
fn asset_with_no_live_variant_is_dropped() {
    let mock = Arc::new(MockTransport::new());
    let f = fetcher(&mock);
    assert_eq!(find_largest(&f, "https://64.media.tumblr.com/abc/tumblr_xyz_640.jpg"), None);
    // 1280 and 640 on media.tumblr.com, then the original.
    assert_eq!(mock.calls().len(), 3);
}

#[test]
fn new_style_asset_is_read_from_its_full_size_page() {
    let mock = Arc::new(MockTransport::new());
    let page = "https://64.media.tumblr.com/abc123/def/s2048x3072/ghi.png";
    mock.route_get(
        page,
        200,
        r#"<html><img src="https://64.media.tumblr.com/other/x.png">
           <img src="https://64.media.tumblr.com/abc123/def/s2048x3072/ghi.pnj"></html>"#,
    );
    let f = fetcher(&mock);
    assert_eq!(
        find_largest(&f, "https://64.media.tumblr.com/abc123/def/s640x960/ghi.png").as_deref(),
        Some("https://64.media.tumblr.com/abc123/def/s2048x3072/ghi.pnj")
    );

    let missing = "https://64.media.tumblr.com/zzz/def/s640x960/ghi.png";
    assert_eq!(find_largest(&f, missing), None);
}

#[test]
fn new_style_asset_without_full_size_page_yields_no_image() {
    let mock = Arc::new(MockTransport::new());
    let source = "https://64.media.tumblr.com/abc123/def/s640x960/ghi.png";
    let s = strategy(&mock, source, None, true);

    assert!(s.image_urls().is_empty());
    assert!(s.preview_urls().is_empty());
    assert_eq!(
        mock.count(Method::Get, "https://64.media.tumblr.com/abc123/def/s2048x3072/ghi.png"),
        1
    );
}

#[test]
fn unknown_hosts_and_relative_candidates() {
    let mock = Arc::new(MockTransport::new());
    let f = fetcher(&mock);
    assert_eq!(
        find_largest(&f, "https://example.com/inline.png").as_deref(),
        Some("https://example.com/inline.png")
    );
    assert_eq!(find_largest(&f, "/relative.png"), None);
    assert!(mock.calls().is_empty());
    assert_eq!(probe_in_order(&f, &[]), None);
}

#[test]
fn photo_post_uses_largest_size_of_each_photo() {
    let mock = Arc::new(MockTransport::new());
    route_post(
        &mock,
        "artist",
        "123",
        r#"{"type":"photo","caption":"<p>two pics</p>","tags":["art"],"photos":[
            {"original_size":{"url":"https://media.tumblr.com/tumblr_a_1280.jpg","width":1280,"height":1920},
             "alt_sizes":[{"url":"https://media.tumblr.com/tumblr_a_640.jpg","width":640,"height":960}]},
            {"original_size":{"url":"https://media.tumblr.com/tumblr_b_500.jpg","width":500,"height":500},
             "alt_sizes":[{"url":"https://media.tumblr.com/tumblr_b_1280.jpg","width":1280,"height":1280}]}
        ]}"#,
    );
    mock.route_head("https://media.tumblr.com/tumblr_a_1280.jpg", 200);
    mock.route_head("https://media.tumblr.com/tumblr_b_1280.jpg", 200);
    let s = strategy(&mock, "https://artist.tumblr.com/post/123/some-slug", None, true);

    assert_eq!(
        s.image_urls(),
        [
            "https://media.tumblr.com/tumblr_a_1280.jpg".to_string(),
            "https://media.tumblr.com/tumblr_b_1280.jpg".to_string(),
        ]
    );
    assert_eq!(
        s.preview_urls(),
        [
            "https://media.tumblr.com/tumblr_a_250.jpg".to_string(),
            "https://media.tumblr.com/tumblr_b_250.jpg".to_string(),
        ]
    );
    assert_eq!(s.commentary_body(), Some("<p>two pics</p>"));
    assert_eq!(s.commentary_title(), None);
    assert_eq!(s.page_url().as_deref(), Some("https://artist.tumblr.com/post/123"));
    assert_eq!(s.normalize_for_source(), "https://artist.tumblr.com/post/123");
    assert_eq!(mock.count_prefix("https://api.tumblr.com/"), 1);
}

#[test]
fn referer_supplies_missing_identity_without_fetching_source() {
    let mock = Arc::new(MockTransport::new());
    let source = "https://64.media.tumblr.com/abc/tumblr_xyz_1280.jpg";
    let s = strategy(&mock, source, Some("https://artist.tumblr.com/post/555"), true);

    assert_eq!(s.artist_name(), Some("artist"));
    assert_eq!(s.work_id(), Some("555"));
    assert_eq!(s.page_url().as_deref(), Some("https://artist.tumblr.com/post/555"));
    assert_eq!(s.profile_url().as_deref(), Some("https://artist.tumblr.com"));
    assert_eq!(mock.count(Method::Get, source), 0);
}

#[test]
fn dashboard_viewer_referer_is_not_an_identity() {
    let mock = Arc::new(MockTransport::new());
    let source = "https://64.media.tumblr.com/abc/tumblr_xyz_1280.jpg";
    let s = strategy(&mock, source, Some("https://www.tumblr.com/blog/view"), true);

    assert_eq!(s.artist_name(), None);
    assert_eq!(s.profile_url(), None);
    assert_eq!(mock.count_prefix("https://api.tumblr.com/"), 0);
}

#[test]
fn source_page_link_supplies_identity_once() {
    let mock = Arc::new(MockTransport::new());
    let source = "https://64.media.tumblr.com/abc/tumblr_xyz_1280.jpg";
    mock.route_get(
        source,
        200,
        r#"<a href="https://artist.tumblr.com/archive">a</a><a href="https://artist.tumblr.com/post/888/slug">p</a>"#,
    );
    let s = strategy(&mock, source, None, false);

    assert_eq!(s.artist_name(), Some("artist"));
    assert_eq!(s.work_id(), Some("888"));
    assert_eq!(s.page_url().as_deref(), Some("https://artist.tumblr.com/post/888"));
    assert_eq!(s.profile_url().as_deref(), Some("https://artist.tumblr.com"));
    assert_eq!(mock.count(Method::Get, source), 1);
}

#[test]
fn disabled_platform_never_calls_api() {
    let mock = Arc::new(MockTransport::new());
    route_post(&mock, "artist", "777", r#"{"type":"text","body":"<p>hi</p>","tags":["x"]}"#);
    let s = strategy(&mock, "https://artist.tumblr.com/post/777", None, false);

    assert_eq!(s.post_lookup(), &PostLookup::NotAttempted(Degradation::PlatformDisabled));
    assert_eq!(s.commentary_body(), None);
    assert!(s.tags().is_empty());
    assert!(s.image_urls().is_empty());
    assert_eq!(s.page_url().as_deref(), Some("https://artist.tumblr.com/post/777"));
    assert_eq!(s.profile_url().as_deref(), Some("https://artist.tumblr.com"));
    assert_eq!(mock.count_prefix("https://api.tumblr.com/"), 0);
}

#[test]
fn unresolved_identity_never_calls_api() {
    let mock = Arc::new(MockTransport::new());
    let source = "https://64.media.tumblr.com/abc/tumblr_xyz_1280.jpg";
    let s = strategy(&mock, source, None, true);

    assert_eq!(s.post_lookup(), &PostLookup::NotAttempted(Degradation::IdentityUnresolved));
    assert_eq!(mock.count_prefix("https://api.tumblr.com/"), 0);
    // The page lookup ran once and was memoized.
    assert_eq!(s.artist_name(), None);
    assert_eq!(mock.count(Method::Get, source), 1);
}

#[test]
fn api_outcomes_are_distinguished() {
    let mock = Arc::new(MockTransport::new());
    mock.route_get(&api_url("artist", "1"), 200, r#"{"response":{"posts":[]}}"#);
    mock.route_get(&api_url("artist", "2"), 500, "oops");
    mock.route_get(&api_url("artist", "3"), 200, "<html>not json</html>");

    let empty = strategy(&mock, "https://artist.tumblr.com/post/1", None, true);
    assert_eq!(empty.post_lookup(), &PostLookup::Empty);
    let failed = strategy(&mock, "https://artist.tumblr.com/post/2", None, true);
    assert_eq!(failed.post_lookup(), &PostLookup::Unavailable);
    assert!(failed.tags().is_empty());
    let garbled = strategy(&mock, "https://artist.tumblr.com/post/3", None, true);
    assert_eq!(garbled.post_lookup(), &PostLookup::Unavailable);
}

#[test]
fn api_is_called_once_per_resolution() {
    let mock = Arc::new(MockTransport::new());
    route_post(&mock, "artist", "9", r#"{"type":"text","title":"T","body":"<p>b</p>","tags":["a"]}"#);
    let s = strategy(&mock, "https://artist.tumblr.com/post/9", None, true);

    let _ = s.bundle(&DefaultTagNormalizer);
    let _ = s.bundle(&DefaultTagNormalizer);
    assert_eq!(mock.count(Method::Get, &api_url("artist", "9")), 1);
}

#[test]
fn commentary_by_post_kind() {
    let mock = Arc::new(MockTransport::new());
    route_post(&mock, "b", "1", r#"{"type":"text","title":"Title","body":"<p>text</p>"}"#);
    route_post(&mock, "b", "2", r#"{"type":"link","title":"Link","description":"<p>desc</p>"}"#);
    route_post(
        &mock,
        "b",
        "3",
        r#"{"type":"answer","asking_name":"anon","question":"Why?","answer":"<p>Because</p>"}"#,
    );
    route_post(&mock, "b", "4", r#"{"type":"quote","text":"q"}"#);

    let text = strategy(&mock, "https://b.tumblr.com/post/1", None, true);
    assert_eq!(text.commentary_title().as_deref(), Some("Title"));
    assert_eq!(text.commentary_body(), Some("<p>text</p>"));

    let link = strategy(&mock, "https://b.tumblr.com/post/2", None, true);
    assert_eq!(link.commentary_title().as_deref(), Some("Link"));
    assert_eq!(link.commentary_body(), Some("<p>desc</p>"));

    let answer = strategy(&mock, "https://b.tumblr.com/post/3", None, true);
    assert_eq!(answer.commentary_title().as_deref(), Some("anon asked: Why?"));
    assert_eq!(answer.commentary_body(), Some("<p>Because</p>"));

    let other = strategy(&mock, "https://b.tumblr.com/post/4", None, true);
    assert_eq!(other.commentary_title(), None);
    assert_eq!(other.commentary_body(), None);
}

#[test]
fn video_and_inline_images_are_collected_in_order() {
    let mock = Arc::new(MockTransport::new());
    route_post(
        &mock,
        "b",
        "5",
        r#"{"type":"video","video_url":"https://va.media.tumblr.com/tumblr_vid.mp4",
            "caption":"<p>see also <img src=\"https://example.com/inline.png\"></p>"}"#,
    );
    let s = strategy(&mock, "https://b.tumblr.com/post/5", None, true);

    let expected = [
        "https://va.media.tumblr.com/tumblr_vid.mp4".to_string(),
        "https://example.com/inline.png".to_string(),
    ];
    assert_eq!(s.image_urls(), expected);
    assert_eq!(s.preview_urls(), expected);
}

#[test]
fn tags_are_deduplicated_with_search_urls() {
    let mock = Arc::new(MockTransport::new());
    route_post(
        &mock,
        "b",
        "6",
        r#"{"type":"text","tags":["fan art","original-character","fan art","OC"]}"#,
    );
    let s = strategy(&mock, "https://b.tumblr.com/post/6", None, true);

    let names: Vec<&str> = s.tags().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["fan art", "original-character", "OC"]);
    assert_eq!(s.tags()[0].url, "https://tumblr.com/tagged/fan+art");
    assert_eq!(s.tags()[1].url, "https://tumblr.com/tagged/original-character");

    let bundle = s.bundle(&DefaultTagNormalizer);
    assert_eq!(bundle.normalized_tags, vec!["fan_art", "original_character", "oc"]);
}

#[test]
fn bundle_keeps_previews_aligned_and_renders_text() {
    let mock = Arc::new(MockTransport::new());
    route_post(
        &mock,
        "b",
        "7",
        r#"{"type":"photo","caption":"<p>line one<br>line two</p>","photos":[
            {"original_size":{"url":"https://media.tumblr.com/tumblr_c_1280.png","width":10,"height":10}}
        ]}"#,
    );
    mock.route_head("https://media.tumblr.com/tumblr_c_1280.png", 200);
    let s = strategy(&mock, "https://b.tumblr.com/post/7", None, true);
    let bundle = s.bundle(&DefaultTagNormalizer);

    assert_eq!(bundle.site_name, "Tumblr");
    assert_eq!(bundle.artist_name.as_deref(), Some("b"));
    assert_eq!(bundle.work_id.as_deref(), Some("7"));
    assert_eq!(bundle.image_urls.len(), bundle.preview_urls.len());
    assert_eq!(bundle.preview_urls, vec!["https://media.tumblr.com/tumblr_c_250.png"]);
    assert_eq!(bundle.commentary_text.as_deref(), Some("line one\nline two"));
}
