//! `artsource resolve` – resolve source URLs concurrently and print the bundles.

use anyhow::{bail, Result};
use artsource_core::{Config, MediaBundle, Registry, ResolveError, Resolver};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
struct Entry<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle: Option<&'a MediaBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run_resolve(
    cfg: &Config,
    urls: &[String],
    referer: Option<&str>,
    jobs: usize,
    format: OutputFormat,
) -> Result<()> {
    let registry = Arc::new(Registry::from_config(cfg));
    let outcomes = resolve_all(registry, urls, referer, jobs).await?;

    let entries: Vec<Entry<'_>> = urls
        .iter()
        .zip(&outcomes)
        .map(|(source, outcome)| Entry {
            source,
            bundle: outcome.as_ref().ok(),
            error: outcome.as_ref().err().map(|e| e.to_string()),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            for entry in &entries {
                print!("{}", render_text(entry.source, entry.bundle, entry.error.as_deref()));
            }
        }
    }

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    if failed > 0 {
        bail!("{failed} of {} source(s) could not be resolved", urls.len());
    }
    Ok(())
}

/// Resolves every URL on the blocking pool, at most `jobs` at a time.
/// Results come back in input order.
pub(crate) async fn resolve_all<R>(
    resolver: Arc<R>,
    urls: &[String],
    referer: Option<&str>,
    jobs: usize,
) -> Result<Vec<Result<MediaBundle, ResolveError>>>
where
    R: Resolver + Send + Sync + 'static,
{
    let permits = Arc::new(Semaphore::new(jobs.max(1)));
    let mut handles = Vec::with_capacity(urls.len());
    for url in urls {
        let permit = Arc::clone(&permits).acquire_owned().await?;
        let resolver = Arc::clone(&resolver);
        let url = url.clone();
        let referer = referer.map(str::to_string);
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            resolver.resolve(&url, referer.as_deref())
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await?);
    }
    Ok(outcomes)
}

pub(crate) fn render_text(source: &str, bundle: Option<&MediaBundle>, error: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{source}");
    if let Some(error) = error {
        let _ = writeln!(out, "  error: {error}");
    }
    let Some(b) = bundle else {
        return out;
    };
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "  site:    {}", b.site_name);
    let _ = writeln!(out, "  page:    {}", dash(&b.page_url));
    let _ = writeln!(out, "  profile: {}", dash(&b.profile_url));
    let _ = writeln!(out, "  artist:  {}", dash(&b.artist_name));
    let _ = writeln!(out, "  title:   {}", dash(&b.commentary_title));
    for (image, preview) in b.image_urls.iter().zip(&b.preview_urls) {
        let _ = writeln!(out, "  image:   {image}");
        if preview != image {
            let _ = writeln!(out, "  preview: {preview}");
        }
    }
    if !b.normalized_tags.is_empty() {
        let _ = writeln!(out, "  tags:    {}", b.normalized_tags.join(" "));
    }
    out
}
