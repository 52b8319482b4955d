//! Attribute-level HTML scanning.
//!
//! Fetched pages are only ever queried for "the first element whose attribute
//! contains X" or "every value of attribute Y on tag Z", so the document is
//! reduced to a flat list of start tags with decoded attributes. Also hosts
//! the HTML-to-plain-text conversion used for commentary.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("valid regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid regex")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("valid regex")
});

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

static BLOCK_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|div|li|blockquote|h[1-6])\s*>").expect("valid regex")
});

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("valid regex"));

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// A start tag and its attributes. Names are lowercased, values entity-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Flat view of the start tags in an HTML document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    elements: Vec<Element>,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        let without_comments = COMMENT_RE.replace_all(html, "");
        let elements = START_TAG_RE
            .captures_iter(&without_comments)
            .map(|caps| Element {
                name: caps[1].to_ascii_lowercase(),
                attrs: parse_attrs(caps.get(2).map_or("", |m| m.as_str())),
            })
            .collect();
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// First `attr` value containing `needle`, optionally restricted to `tag`.
    ///
    /// Equivalent to the CSS selector `tag[attr*='needle']`.
    pub fn find_attr_containing(&self, tag: Option<&str>, attr: &str, needle: &str) -> Option<&str> {
        self.elements
            .iter()
            .filter(|e| tag.map_or(true, |t| e.name.eq_ignore_ascii_case(t)))
            .filter_map(|e| e.attr(attr))
            .find(|v| v.contains(needle))
    }

    /// Every non-empty `attr` value on `tag` elements, in document order.
    pub fn attr_values<'a>(&'a self, tag: &'a str, attr: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.elements
            .iter()
            .filter(move |e| e.name.eq_ignore_ascii_case(tag))
            .filter_map(move |e| e.attr(attr))
            .filter(|v| !v.is_empty())
    }
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            (caps[1].to_ascii_lowercase(), decode_entities(value))
        })
        .collect()
}

/// Decodes numeric and common named character references.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    ENTITY_RE
        .replace_all(s, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Renders commentary HTML as plain text: block ends and `<br>` become
/// newlines, remaining tags are dropped, entities are decoded.
pub fn to_plain_text(html: &str) -> String {
    let text = COMMENT_RE.replace_all(html, "");
    let text = LINE_BREAK_RE.replace_all(&text, "\n");
    let text = BLOCK_END_RE.replace_all(&text, "\n\n");
    let text = ANY_TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text).replace('\u{a0}', " ");
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    BLANK_LINES_RE
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}
