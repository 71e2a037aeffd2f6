//! Quizmark CLI
//!
//! Validates YAML front matter and quiz blocks across a Markdown book.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use quizmark_cli::{commands, logging, Cli, EXIT_FAILURE};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    logging::init(cli.verbose, cli.quiet);
    tracing::debug!("quizmark {}", env!("CARGO_PKG_VERSION"));

    match commands::dispatch(cli.config.as_deref(), cli.command).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
