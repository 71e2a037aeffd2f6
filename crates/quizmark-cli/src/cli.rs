//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use quizmark_core::config::CONFIG_ENV_VAR;
use quizmark_core::{ReportFormat, SeverityLevel};

/// Validate front matter and quiz blocks across a Markdown book.
#[derive(Parser, Debug)]
#[command(name = "quizmark", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check every document under a directory and report issues
    Validate(ValidateArgs),

    /// Write the parsed document model as JSON
    Export(ExportArgs),

    /// Configuration operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Root directory of the document tree
    pub root: PathBuf,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Lowest severity that makes the run fail
    #[arg(long, value_enum)]
    pub fail_on: Option<FailOnArg>,

    /// Maximum number of documents parsed at once
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Skip the internal link check
    #[arg(long)]
    pub no_links: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Root directory of the document tree
    pub root: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with status 1 when error-severity issues exist
    #[arg(long)]
    pub strict: bool,

    /// Maximum number of documents parsed at once
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the resolved configuration as TOML
    Show {
        /// Root directory whose quizmark.toml is used
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Write a default quizmark.toml
    Init {
        /// Directory to write quizmark.toml into
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOnArg {
    Error,
    Warning,
}

impl From<FailOnArg> for SeverityLevel {
    fn from(arg: FailOnArg) -> Self {
        match arg {
            FailOnArg::Error => SeverityLevel::Error,
            FailOnArg::Warning => SeverityLevel::Warning,
        }
    }
}
