//! Resolver interface: one source URL (plus optional referer) in, one
//! [`MediaBundle`] out.
//!
//! Callers only depend on this trait; which platform strategy runs is decided
//! by the [`Registry`] behind it.

use crate::bundle::MediaBundle;
use crate::error::ResolveError;
use crate::strategy::{Registry, SourceStrategy, Strategy};
use crate::url_model::{ParsedUrl, Site};

/// Turns a source URL into a bundle. Blocking; run one resolution per thread.
pub trait Resolver {
    fn resolve(&self, source: &str, referer: Option<&str>) -> Result<MediaBundle, ResolveError>;
}

impl Resolver for Registry {
    fn resolve(&self, source: &str, referer: Option<&str>) -> Result<MediaBundle, ResolveError> {
        let parsed = ParsedUrl::parse(source);
        if parsed.site == Site::Unknown && !parsed.has_url_structure() {
            return Err(ResolveError::UnparseableSource(source.to_string()));
        }

        let strategy = self.strategy_for(parsed, referer.map(ParsedUrl::parse));
        let bundle = strategy.bundle(self.normalizer());
        tracing::info!(
            source,
            site = %bundle.site_name,
            strategy = strategy_name(&strategy),
            images = bundle.image_urls.len(),
            tags = bundle.tags.len(),
            "resolved source"
        );
        Ok(bundle)
    }
}

fn strategy_name(strategy: &Strategy) -> &'static str {
    match strategy {
        Strategy::Tumblr(_) => "tumblr",
        Strategy::Null(_) => "null",
    }
}
