//! Parse HTTP response header lines collected by the transport.

/// Parses raw header lines into `(name, value)` pairs.
///
/// Only the last response in a redirect chain is kept: every status line
/// (`HTTP/...`) starts a fresh header block.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    headers
}

/// Case-insensitive header lookup.
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
