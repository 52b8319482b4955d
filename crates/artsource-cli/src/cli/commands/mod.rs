//! CLI command handlers. Each command is in its own file.

mod completions;
mod parse;
mod resolve;

pub use completions::{run_completions, run_man};
pub use parse::run_parse;
pub use resolve::run_resolve;

#[cfg(test)]
pub(crate) use resolve::{render_text, resolve_all};
