//! # quizmark-cli
//!
//! Command-line front end for quizmark:
//! - `quizmark validate <root>`: report front matter, quiz and link issues
//! - `quizmark export <root>`: write the parsed document model as JSON
//! - `quizmark config show|init`: inspect or create `quizmark.toml`
//!
//! Exit status is 0 when nothing blocking was found, 1 when issues at or
//! above `--fail-on` exist, and 2 for invocation or environment failures.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use cli::Cli;
pub use pipeline::{IssueSink, RunOutput};
pub use report::{Report, EXIT_FAILURE, EXIT_ISSUES, EXIT_OK};
