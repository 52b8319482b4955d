//! Path segment helpers.

/// Returns the non-empty path segments of `url`, percent-encoding untouched.
pub fn path_segments(url: &url::Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Splits `file` into `(stem, extension)` at the last dot.
///
/// Returns `None` when there is no extension or the stem is empty.
pub(crate) fn split_extension(file: &str) -> Option<(&str, &str)> {
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some((stem, ext))
}
