use artsource_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // File logging when possible; otherwise stderr so the CLI still runs.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable ({e:#}); logging to stderr");
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("artsource error: {:#}", err);
        std::process::exit(1);
    }
}
