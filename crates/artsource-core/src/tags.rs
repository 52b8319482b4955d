//! Cross-platform tag-name normalization.

/// Turns a raw platform tag into a canonical tag name. Must be pure.
pub trait TagNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> String;
}

/// Lowercases, joins words with `_`, and trims separators from the ends.
///
/// `"  Original Character "` becomes `"original_character"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTagNormalizer;

impl TagNormalizer for DefaultTagNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut pending_separator = false;

        for c in raw.trim().chars() {
            if c.is_whitespace() || c == '_' {
                pending_separator = !out.is_empty();
                continue;
            }
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.extend(c.to_lowercase());
        }

        out
    }
}
