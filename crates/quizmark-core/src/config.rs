//! Configuration file support.
//!
//! Configuration is optional. It is read from, in order: an explicit path,
//! the `QUIZMARK_CONFIG` variable (wired up by the CLI), and
//! `quizmark.toml` in the corpus root. Missing files yield defaults.
//!
//! ```toml
//! [loader]
//! extensions = ["md", "markdown"]
//! exclude = ["**/drafts/**"]
//! concurrency = 8
//!
//! [validate]
//! duplicate_severity = "error"
//! check_links = true
//! link_severity = "warning"
//!
//! [report]
//! format = "text"
//! fail_on = "error"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::issue::Severity;

/// File name looked up in the corpus root.
pub const CONFIG_FILE_NAME: &str = "quizmark.toml";

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "QUIZMARK_CONFIG";

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub loader: LoaderConfig,
    pub validate: ValidateConfig,
    pub report: ReportConfig,
}

/// Document discovery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// File extensions (without dot) treated as documents.
    pub extensions: Vec<String>,
    /// Glob patterns, relative to the root, of paths to skip.
    pub exclude: Vec<String>,
    /// Maximum number of documents parsed at once.
    pub concurrency: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "markdown".to_string()],
            exclude: Vec::new(),
            concurrency: default_concurrency(),
        }
    }
}

impl LoaderConfig {
    /// Compiled exclude patterns.
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p)
                    .map_err(|e| Error::config(format!("invalid exclude pattern '{p}': {e}")))
            })
            .collect()
    }

    /// Whether `path` has one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Cross-document check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateConfig {
    /// Severity of duplicate navigation weights and canonical URLs.
    pub duplicate_severity: SeverityLevel,
    /// Whether internal link targets are checked.
    pub check_links: bool,
    /// Severity of broken internal links.
    pub link_severity: SeverityLevel,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            duplicate_severity: SeverityLevel::Error,
            check_links: true,
            link_severity: SeverityLevel::Warning,
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub fail_on: SeverityLevel,
}

/// Serializable mirror of [`Severity`] for configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    #[default]
    Error,
    Warning,
}

impl From<SeverityLevel> for Severity {
    fn from(level: SeverityLevel) -> Self {
        match level {
            SeverityLevel::Error => Severity::Error,
            SeverityLevel::Warning => Severity::Warning,
        }
    }
}

impl FromStr for SeverityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(SeverityLevel::Error),
            "warning" | "warn" => Ok(SeverityLevel::Warning),
            other => Err(Error::config(format!(
                "unknown severity '{other}' (expected 'error' or 'warning')"
            ))),
        }
    }
}

/// Output format of the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

impl Config {
    /// Load configuration for a run over `root`.
    ///
    /// An explicit path must exist. Without one, `root/quizmark.toml` is
    /// used if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        let path = match Self::resolve_path(explicit, root) {
            Some(path) => path,
            None => {
                log::debug!("No configuration file found, using defaults");
                return Ok(Self::default());
            }
        };
        Self::from_file(&path)
    }

    /// Resolve which config file applies, if any.
    pub fn resolve_path(explicit: Option<&Path>, root: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let candidate = root.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found(
                path.to_string_lossy(),
                "configuration file",
            ));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.loader.concurrency == 0 {
            return Err(Error::config("loader.concurrency must be at least 1"));
        }
        if self.loader.extensions.is_empty() {
            return Err(Error::config("loader.extensions must not be empty"));
        }
        self.loader.exclude_patterns()?;
        Ok(())
    }

}
