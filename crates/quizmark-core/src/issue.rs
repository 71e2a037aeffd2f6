//! Validation issues and the per-document parse errors that feed them.
//!
//! Parsers return [`FrontMatterError`] and [`QuizError`] values; the
//! validator turns them into [`ValidationIssue`]s alongside its own
//! cross-document findings. None of these are ever mutated after creation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Number of characters of a question stem quoted in quiz messages.
pub const STEM_PREFIX_LEN: usize = 40;

// ============================================================================
// Severity, kind, location
// ============================================================================

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier for each class of issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    IoError,
    FrontMatterMissing,
    FrontMatterMalformed,
    MissingRequiredField,
    InvalidType,
    InvalidDate,
    UnsupportedKey,
    AmbiguousCorrectness,
    InsufficientOptions,
    MissingExplanation,
    EmptyStem,
    UnterminatedBlock,
    EmptyBlock,
    DuplicateNavWeight,
    DuplicateCanonicalUrl,
    BrokenLink,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::IoError => "io-error",
            IssueKind::FrontMatterMissing => "front-matter-missing",
            IssueKind::FrontMatterMalformed => "front-matter-malformed",
            IssueKind::MissingRequiredField => "missing-required-field",
            IssueKind::InvalidType => "invalid-type",
            IssueKind::InvalidDate => "invalid-date",
            IssueKind::UnsupportedKey => "unsupported-key",
            IssueKind::AmbiguousCorrectness => "ambiguous-correctness",
            IssueKind::InsufficientOptions => "insufficient-options",
            IssueKind::MissingExplanation => "missing-explanation",
            IssueKind::EmptyStem => "empty-stem",
            IssueKind::UnterminatedBlock => "unterminated-block",
            IssueKind::EmptyBlock => "empty-block",
            IssueKind::DuplicateNavWeight => "duplicate-nav-weight",
            IssueKind::DuplicateCanonicalUrl => "duplicate-canonical-url",
            IssueKind::BrokenLink => "broken-link",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in a document an issue was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    /// 1-based line number, when the issue points at a specific line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    pub fn line(line: usize) -> Self {
        Self { line: Some(line) }
    }
}

// ============================================================================
// ValidationIssue
// ============================================================================

/// A single reported defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub document_path: PathBuf,
    pub message: String,
    pub location: Location,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        kind: IssueKind,
        document_path: impl AsRef<Path>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            document_path: document_path.as_ref().to_path_buf(),
            message: message.into(),
            location: Location::default(),
        }
    }

    pub fn error(kind: IssueKind, path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, path, message)
    }

    pub fn warning(kind: IssueKind, path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, path, message)
    }

    /// Attach a line number.
    pub fn at_line(mut self, line: usize) -> Self {
        self.location = Location::line(line);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Sort issues by document path, then message.
///
/// Ties are broken by line and kind so the order is total.
pub fn sort_issues(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.document_path
            .cmp(&b.document_path)
            .then_with(|| a.message.cmp(&b.message))
            .then_with(|| a.location.line.cmp(&b.location.line))
            .then_with(|| a.kind.cmp(&b.kind))
    });
}

// ============================================================================
// Front-matter errors
// ============================================================================

/// Why a document's front matter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontMatterErrorKind {
    /// No fence pair at the start of the document.
    Missing,
    /// Fences found but the content is not a YAML mapping, or the closing
    /// fence is absent.
    Malformed,
    /// `title` or the navigation weight is absent.
    MissingRequiredField,
    /// A known field has a value of the wrong type or range.
    InvalidType,
    /// `date` is not a recognizable date. The front matter is still kept.
    InvalidDate,
    /// An entry whose key is null or not a scalar. The entry is dropped.
    UnsupportedKey,
}

impl FrontMatterErrorKind {
    pub fn severity(&self) -> Severity {
        match self {
            FrontMatterErrorKind::InvalidDate | FrontMatterErrorKind::UnsupportedKey => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn issue_kind(&self) -> IssueKind {
        match self {
            FrontMatterErrorKind::Missing => IssueKind::FrontMatterMissing,
            FrontMatterErrorKind::Malformed => IssueKind::FrontMatterMalformed,
            FrontMatterErrorKind::MissingRequiredField => IssueKind::MissingRequiredField,
            FrontMatterErrorKind::InvalidType => IssueKind::InvalidType,
            FrontMatterErrorKind::InvalidDate => IssueKind::InvalidDate,
            FrontMatterErrorKind::UnsupportedKey => IssueKind::UnsupportedKey,
        }
    }
}

impl fmt::Display for FrontMatterErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.issue_kind().as_str())
    }
}

/// A front-matter defect in one document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FrontMatterError {
    pub kind: FrontMatterErrorKind,
    pub message: String,
    /// 1-based line the defect points at, when known.
    pub line: Option<usize>,
}

impl FrontMatterError {
    pub fn new(kind: FrontMatterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn missing() -> Self {
        Self::new(
            FrontMatterErrorKind::Missing,
            "document does not start with a `---` front matter fence",
        )
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            FrontMatterErrorKind::MissingRequiredField,
            format!("required field `{field}` is missing"),
        )
    }

    pub fn invalid_type(field: &str, expected: &str) -> Self {
        Self::new(
            FrontMatterErrorKind::InvalidType,
            format!("field `{field}` must be {expected}"),
        )
    }

    /// Append what was actually found to the message.
    pub fn with_found(mut self, found: &str) -> Self {
        self.message = format!("{}, found {found}", self.message);
        self
    }

    /// Convert into a reportable issue for `path`.
    pub fn to_issue(&self, path: &Path) -> ValidationIssue {
        let issue = ValidationIssue::new(
            self.kind.severity(),
            self.kind.issue_kind(),
            path,
            self.message.clone(),
        );
        match self.line {
            Some(line) => issue.at_line(line),
            None => issue,
        }
    }
}

// ============================================================================
// Quiz errors
// ============================================================================

/// Why a quiz question (or block) was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizErrorKind {
    /// Zero or more than one option marked correct.
    AmbiguousCorrectness,
    /// Fewer than two options.
    InsufficientOptions,
    /// No `> **Explanation:**` line.
    MissingExplanation,
    /// Stem is blank.
    EmptyStem,
    /// Start marker without a matching end marker.
    UnterminatedBlock,
    /// Quiz region with no questions in it.
    EmptyBlock,
}

impl QuizErrorKind {
    pub fn severity(&self) -> Severity {
        match self {
            QuizErrorKind::MissingExplanation | QuizErrorKind::EmptyBlock => Severity::Warning,
            QuizErrorKind::AmbiguousCorrectness
            | QuizErrorKind::InsufficientOptions
            | QuizErrorKind::EmptyStem
            | QuizErrorKind::UnterminatedBlock => Severity::Error,
        }
    }

    pub fn issue_kind(&self) -> IssueKind {
        match self {
            QuizErrorKind::AmbiguousCorrectness => IssueKind::AmbiguousCorrectness,
            QuizErrorKind::InsufficientOptions => IssueKind::InsufficientOptions,
            QuizErrorKind::MissingExplanation => IssueKind::MissingExplanation,
            QuizErrorKind::EmptyStem => IssueKind::EmptyStem,
            QuizErrorKind::UnterminatedBlock => IssueKind::UnterminatedBlock,
            QuizErrorKind::EmptyBlock => IssueKind::EmptyBlock,
        }
    }
}

impl fmt::Display for QuizErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.issue_kind().as_str())
    }
}

/// A defect in one quiz question or quiz block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}: {message}")]
pub struct QuizError {
    pub kind: QuizErrorKind,
    /// 1-based line of the question heading (or block marker).
    pub line: usize,
    /// Leading characters of the stem, for locating the question.
    pub stem_prefix: String,
    pub message: String,
}

impl QuizError {
    pub fn new(kind: QuizErrorKind, line: usize, stem: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            stem_prefix: stem_prefix(stem),
            message: message.into(),
        }
    }

    /// Convert into a reportable issue for `path`.
    pub fn to_issue(&self, path: &Path) -> ValidationIssue {
        let message = if self.stem_prefix.is_empty() {
            self.message.clone()
        } else {
            format!("{} (question \"{}\")", self.message, self.stem_prefix)
        };
        ValidationIssue::new(self.kind.severity(), self.kind.issue_kind(), path, message)
            .at_line(self.line)
    }
}

/// First line of `stem`, cut to [`STEM_PREFIX_LEN`] characters.
pub fn stem_prefix(stem: &str) -> String {
    let first_line = stem.lines().next().unwrap_or("").trim();
    let mut chars = first_line.chars();
    let prefix: String = chars.by_ref().take(STEM_PREFIX_LEN).collect();
    if chars.next().is_some() {
        format!("{prefix}...")
    } else {
        prefix
    }
}
