//! Corpus-wide uniqueness of navigation weights and canonical URLs.
//!
//! Documents are grouped by key. In a group of `n > 1` documents, the
//! first by path is kept and each of the other `n - 1` gets one issue
//! whose message lists every path in the group.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use quizmark_core::util::paths::display_path;
use quizmark_core::{Document, IssueKind, Severity, ValidationIssue};

use crate::Check;

/// Flags documents sharing a `nav_weight`.
#[derive(Debug, Clone, Copy)]
pub struct NavWeightCheck {
    severity: Severity,
}

impl NavWeightCheck {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }
}

impl Check for NavWeightCheck {
    fn name(&self) -> &'static str {
        "nav-weight"
    }

    fn check(&self, documents: &[&Document]) -> Vec<ValidationIssue> {
        let groups = group_by(documents, |doc| doc.nav_weight());
        duplicates(
            groups,
            self.severity,
            IssueKind::DuplicateNavWeight,
            "nav_weight",
        )
    }
}

/// Flags documents sharing a non-empty `canonical_url`.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalUrlCheck {
    severity: Severity,
}

impl CanonicalUrlCheck {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }
}

impl Check for CanonicalUrlCheck {
    fn name(&self) -> &'static str {
        "canonical-url"
    }

    fn check(&self, documents: &[&Document]) -> Vec<ValidationIssue> {
        let groups = group_by(documents, |doc| doc.canonical_url());
        duplicates(
            groups,
            self.severity,
            IssueKind::DuplicateCanonicalUrl,
            "canonical_url",
        )
    }
}

/// Group document paths by key, skipping documents without one.
fn group_by<'a, K, F>(documents: &[&'a Document], key: F) -> BTreeMap<K, Vec<&'a Path>>
where
    K: Ord,
    F: Fn(&'a Document) -> Option<K>,
{
    let mut groups: BTreeMap<K, Vec<&'a Path>> = BTreeMap::new();
    for doc in documents.iter().copied() {
        if let Some(k) = key(doc) {
            groups.entry(k).or_default().push(doc.path.as_path());
        }
    }
    groups
}

fn duplicates<K: Display>(
    groups: BTreeMap<K, Vec<&Path>>,
    severity: Severity,
    kind: IssueKind,
    field: &str,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (key, mut paths) in groups {
        if paths.len() < 2 {
            continue;
        }
        paths.sort();
        let listed = paths
            .iter()
            .map(|p| display_path(p))
            .collect::<Vec<_>>()
            .join(", ");
        log::debug!("Duplicate {field} {key}: {listed}");

        for path in &paths[1..] {
            issues.push(ValidationIssue::new(
                severity,
                kind,
                path,
                format!("duplicate {field} {key} shared by {listed}"),
            ));
        }
    }
    issues
}
