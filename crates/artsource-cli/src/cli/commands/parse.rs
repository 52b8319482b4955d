//! `artsource parse` – show the URL model for one URL.

use anyhow::Result;
use artsource_core::ParsedUrl;

pub fn run_parse(url: &str) -> Result<()> {
    let parsed = ParsedUrl::parse(url);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
