//! Error types for quizmark-core.
//!
//! These are run-level failures: a configuration file that cannot be read,
//! a root directory that does not exist. Per-document defects are never
//! reported through this type; they are collected as
//! [`ValidationIssue`](crate::ValidationIssue)s instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for quizmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a quizmark run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error tied to a specific path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Parse error outside of document content (config files, globs).
    #[error("Parse error: {message}")]
    Parse {
        /// What failed to parse
        message: String,
    },

    /// A required path does not exist.
    #[error("{kind} not found: {path}")]
    NotFound {
        /// The missing path
        path: String,
        /// What kind of thing was expected there
        kind: String,
    },
}

impl Error {
    /// Creates an I/O error carrying the path that failed.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates a not-found error for `path`, described as `kind`.
    pub fn not_found<P, K>(path: P, kind: K) -> Self
    where
        P: Into<String>,
        K: Into<String>,
    {
        Error::NotFound {
            path: path.into(),
            kind: kind.into(),
        }
    }
}
