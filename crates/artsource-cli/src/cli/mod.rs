//! CLI for the artsource resolver.

mod commands;

use anyhow::Result;
use artsource_core::config::{self, Config};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use commands::{run_completions, run_man, run_parse, run_resolve};

/// Top-level CLI for the artsource resolver.
#[derive(Debug, Parser)]
#[command(name = "artsource")]
#[command(
    about = "artsource: resolve artwork URLs to their post, artist, and full-size images",
    long_about = None
)]
pub struct Cli {
    /// Read configuration from this file instead of the XDG config path.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON array with an entry per source.
    Json,
    /// Human-readable summary per source.
    Text,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve one or more source URLs into media bundles.
    Resolve {
        /// Source URLs (image, post, or profile links).
        #[arg(required = true, num_args = 1..)]
        urls: Vec<String>,

        /// Page the sources were found on; used when a source lacks the artist or post id.
        #[arg(long, value_name = "URL")]
        referer: Option<String>,

        /// Resolve up to N sources concurrently.
        #[arg(long, default_value = "4", value_name = "N")]
        jobs: usize,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Show how a URL is classified, without any network access.
    Parse {
        /// URL to classify.
        url: String,
    },

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Resolve {
                urls,
                referer,
                jobs,
                format,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_resolve(&cfg, &urls, referer.as_deref(), jobs, format).await?;
            }
            CliCommand::Parse { url } => run_parse(&url)?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!(
        tumblr_api = cfg.tumblr.active_api_key().is_some(),
        http = ?cfg.http,
        "loaded config"
    );
    Ok(cfg)
}

#[cfg(test)]
mod tests;
