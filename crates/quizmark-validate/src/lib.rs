//! Cross-document validation for quizmark.
//!
//! Validation runs once every document has been parsed. It performs no
//! I/O: each [`Check`] inspects the full, path-sorted document set and
//! returns [`ValidationIssue`]s. The [`Validator`] runs its registered
//! checks in order and concatenates their findings.
//!
//! # Example
//!
//! ```
//! use quizmark_content::parse_document;
//! use quizmark_core::ValidateConfig;
//! use quizmark_validate::Validator;
//!
//! let docs = vec![
//!     parse_document("a.md", "---\ntitle: A\nweight: 640000\n---\n"),
//!     parse_document("b.md", "---\ntitle: B\nweight: 640000\n---\n"),
//! ];
//! let issues = Validator::with_defaults(&ValidateConfig::default()).validate(&docs);
//!
//! assert_eq!(issues.len(), 1);
//! assert!(issues[0].message.contains("a.md"));
//! assert!(issues[0].message.contains("b.md"));
//! ```

pub mod links;
pub mod rollup;
pub mod uniqueness;

mod proptests;

use quizmark_core::{Document, ValidateConfig, ValidationIssue};

// Re-export checks
pub use links::LinkCheck;
pub use rollup::ParseDiagnosticsCheck;
pub use uniqueness::{CanonicalUrlCheck, NavWeightCheck};

/// A validation pass over the whole corpus.
pub trait Check: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Inspect `documents` (sorted by path) and report issues.
    fn check(&self, documents: &[&Document]) -> Vec<ValidationIssue>;
}

/// Runs a list of checks against a document set.
pub struct Validator {
    checks: Vec<Box<dyn Check>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a validator with no checks.
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Create a validator with every built-in check, configured by `config`.
    pub fn with_defaults(config: &ValidateConfig) -> Self {
        let mut validator = Self::new();
        validator.add_check(Box::new(ParseDiagnosticsCheck));
        validator.checks.extend(Self::cross_document(config).checks);
        validator
    }

    /// Create a validator with only the checks that need the whole corpus.
    ///
    /// Per-document parse errors are left out; callers that surface them as
    /// documents arrive use this at the aggregation barrier.
    pub fn cross_document(config: &ValidateConfig) -> Self {
        let mut validator = Self::new();
        validator.add_check(Box::new(NavWeightCheck::new(
            config.duplicate_severity.into(),
        )));
        validator.add_check(Box::new(CanonicalUrlCheck::new(
            config.duplicate_severity.into(),
        )));
        if config.check_links {
            validator.add_check(Box::new(LinkCheck::new(config.link_severity.into())));
        }
        validator
    }

    pub fn add_check(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every check and collect the issues.
    ///
    /// Documents are sorted by path first, so results do not depend on the
    /// order in which parsing finished.
    pub fn validate(&self, documents: &[Document]) -> Vec<ValidationIssue> {
        let mut sorted: Vec<&Document> = documents.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        let mut issues = Vec::new();
        for check in &self.checks {
            let found = check.check(&sorted);
            log::debug!("Check '{}' reported {} issue(s)", check.name(), found.len());
            issues.extend(found);
        }
        issues
    }
}

/// Validate `documents` with the built-in checks.
pub fn validate(documents: &[Document], config: &ValidateConfig) -> Vec<ValidationIssue> {
    Validator::with_defaults(config).validate(documents)
}
