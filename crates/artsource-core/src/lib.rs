//! Artwork source resolution.
//!
//! Given the URL where a piece of art was found, [`Resolver::resolve`] works
//! out the canonical post page, the artist, the best-quality asset URLs with
//! matching previews, the commentary, and the tags, and returns them as one
//! [`MediaBundle`].

pub mod bundle;
pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod logging;
pub mod resolver;
pub mod retry;
pub mod strategy;
pub mod tags;
pub mod url_model;

pub use bundle::{MediaBundle, Tag};
pub use config::Config;
pub use error::{Degradation, ResolveError};
pub use resolver::Resolver;
pub use strategy::{Registry, SourceStrategy, Strategy};
pub use url_model::ParsedUrl;
