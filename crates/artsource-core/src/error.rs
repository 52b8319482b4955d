//! Resolution outcomes that are not a full bundle.

/// The one fatal resolution failure.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The source is not an http(s) URL and matches no known site.
    #[error("unparseable source {0:?}: not a URL and matches no known site")]
    UnparseableSource(String),
}

/// Conditions that leave fields empty without failing the resolution.
///
/// They are logged where they happen and converted into absent values; none
/// of them crosses a strategy method boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Degradation {
    #[error("platform API disabled or not configured")]
    PlatformDisabled,
    #[error("artist or work id could not be resolved")]
    IdentityUnresolved,
    #[error("platform API unavailable")]
    ApiUnavailable,
    #[error("no candidate asset location responded")]
    AssetProbeFailed,
}
