//! Quizmark Core: shared types, errors, configuration, and utilities.
//!
//! This crate provides the foundational types used across all quizmark
//! crates. It has no internal quizmark dependencies.
//!
//! # Modules
//!
//! - [`error`]: Run-level error type and Result alias
//! - [`model`]: Parsed documents, front matter, quiz blocks
//! - [`issue`]: Validation issues and per-document parse errors
//! - [`config`]: TOML configuration
//! - [`util`]: Path utilities

pub mod config;
pub mod error;
pub mod issue;
pub mod model;
pub mod util;

// Re-export key types at crate root for convenience
pub use config::{Config, LoaderConfig, ReportConfig, ReportFormat, SeverityLevel, ValidateConfig};
pub use error::{Error, Result};
pub use issue::{
    sort_issues, FrontMatterError, FrontMatterErrorKind, IssueKind, Location, QuizError,
    QuizErrorKind, Severity, ValidationIssue,
};
pub use model::{
    Document, FrontMatter, Link, LinkKind, ParseDiagnostics, QuizBlock, QuizOption, QuizQuestion,
};
