//! Internal link target check.
//!
//! A link is checked only when it points at another document of the
//! corpus: a relative path ending in `.md`/`.markdown`, or one with no
//! extension at all. External URLs, fragment-only links, site-absolute
//! Markdown links and asset links are skipped.
//!
//! Targets resolve against the linking document's directory. `ref` and
//! `relref` shortcodes also resolve against the corpus root, and a leading
//! `/` in them means the root. Extensionless targets match `<t>.md`,
//! `<t>/_index.md` or `<t>/index.md`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quizmark_core::util::paths::{display_path, resolve_relative};
use quizmark_core::{Document, IssueKind, Link, LinkKind, Severity, ValidationIssue};

use crate::Check;

const DOCUMENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Flags links whose target is not a loaded document.
#[derive(Debug, Clone, Copy)]
pub struct LinkCheck {
    severity: Severity,
}

impl LinkCheck {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }
}

impl Check for LinkCheck {
    fn name(&self) -> &'static str {
        "links"
    }

    fn check(&self, documents: &[&Document]) -> Vec<ValidationIssue> {
        let known: HashSet<String> = documents.iter().map(|d| display_path(&d.path)).collect();
        let mut issues = Vec::new();

        for doc in documents {
            let base = doc.path.parent().unwrap_or(Path::new(""));
            for link in &doc.links {
                let Some(target) = internal_target(link) else {
                    continue;
                };
                let found = candidates(base, link.kind, target)
                    .iter()
                    .any(|c| known.contains(&display_path(c)));
                if !found {
                    issues.push(
                        ValidationIssue::new(
                            self.severity,
                            IssueKind::BrokenLink,
                            &doc.path,
                            format!("link target \"{}\" does not match any document", link.target),
                        )
                        .at_line(link.line),
                    );
                }
            }
        }
        issues
    }
}

/// The path part of `link` if it should point into the corpus.
fn internal_target(link: &Link) -> Option<&str> {
    let target = link.target.trim();
    if url::Url::parse(target).is_ok() || target.starts_with("//") {
        return None;
    }

    let path = target
        .split(['#', '?'])
        .next()
        .unwrap_or("")
        .trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with('/') && link.kind == LinkKind::Markdown {
        return None;
    }

    match Path::new(path).extension() {
        None => Some(path),
        Some(ext) => {
            let ext = ext.to_string_lossy();
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|e| ext.eq_ignore_ascii_case(e))
                .then_some(path)
        }
    }
}

/// Corpus-relative paths `target` may refer to.
fn candidates(base: &Path, kind: LinkKind, target: &str) -> Vec<PathBuf> {
    let mut bases: Vec<&Path> = Vec::new();
    let target = match (kind, target.strip_prefix('/')) {
        (LinkKind::Ref | LinkKind::RelRef, Some(rooted)) => {
            bases.push(Path::new(""));
            rooted
        }
        (LinkKind::Ref | LinkKind::RelRef, None) => {
            bases.push(base);
            bases.push(Path::new(""));
            target
        }
        (LinkKind::Markdown, _) => {
            bases.push(base);
            target
        }
    };
    let has_extension = Path::new(target).extension().is_some();

    let mut out = Vec::new();
    for base in bases {
        let Some(resolved) = resolve_relative(base, target) else {
            continue;
        };
        if has_extension {
            out.push(resolved);
            continue;
        }
        if resolved.as_os_str().is_empty() {
            out.push(PathBuf::from("_index.md"));
            out.push(PathBuf::from("index.md"));
        } else {
            let mut file = resolved.clone().into_os_string();
            file.push(".md");
            out.push(PathBuf::from(file));
            out.push(resolved.join("_index.md"));
            out.push(resolved.join("index.md"));
        }
    }
    out
}
