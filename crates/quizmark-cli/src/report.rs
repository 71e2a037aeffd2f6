//! Rendering issues and computing the exit status.

use std::fmt::Write as _;

use quizmark_core::util::paths::display_path;
use quizmark_core::{sort_issues, ReportFormat, Severity, SeverityLevel, ValidationIssue};

/// Exit status: nothing blocking.
pub const EXIT_OK: u8 = 0;
/// Exit status: issues at or above the `fail_on` severity.
pub const EXIT_ISSUES: u8 = 1;
/// Exit status: invocation or environment failure, or interrupted run.
pub const EXIT_FAILURE: u8 = 2;

/// A sorted list of issues plus run totals.
#[derive(Debug, Clone, Default)]
pub struct Report {
    issues: Vec<ValidationIssue>,
    documents: usize,
    interrupted: bool,
}

impl Report {
    pub fn new(mut issues: Vec<ValidationIssue>, documents: usize) -> Self {
        sort_issues(&mut issues);
        Self {
            issues,
            documents,
            interrupted: false,
        }
    }

    /// Mark the report as covering only part of the corpus.
    pub fn interrupted(mut self, interrupted: bool) -> Self {
        self.interrupted = interrupted;
        self
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_warning()).count()
    }

    /// Render in the requested format.
    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
        }
    }

    /// One line per issue, then a summary line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for issue in &self.issues {
            let _ = writeln!(out, "{}", format_issue(issue));
        }
        let _ = write!(out, "{}", self.summary());
        if self.interrupted {
            out.push_str(" (interrupted, partial results)");
        }
        out.push('\n');
        out
    }

    /// The issue list as a JSON array.
    pub fn render_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(&self.issues)?;
        json.push('\n');
        Ok(json)
    }

    /// `N error(s), M warning(s) in K document(s)`
    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s) in {} document(s)",
            self.error_count(),
            self.warning_count(),
            self.documents
        )
    }

    /// Process exit status for this report.
    pub fn exit_code(&self, fail_on: SeverityLevel) -> u8 {
        if self.interrupted {
            return EXIT_FAILURE;
        }
        let threshold = Severity::from(fail_on);
        if self.issues.iter().any(|i| i.severity >= threshold) {
            EXIT_ISSUES
        } else {
            EXIT_OK
        }
    }
}

/// `<severity>[<kind>] <path>:<line>: <message>`
pub fn format_issue(issue: &ValidationIssue) -> String {
    let path = display_path(&issue.document_path);
    match issue.location.line {
        Some(line) => format!(
            "{}[{}] {}:{}: {}",
            issue.severity, issue.kind, path, line, issue.message
        ),
        None => format!(
            "{}[{}] {}: {}",
            issue.severity, issue.kind, path, issue.message
        ),
    }
}
