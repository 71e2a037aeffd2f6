//! Whole-document parsing.

use std::path::PathBuf;

use quizmark_core::{Document, ParseDiagnostics};

use crate::markdown::{extract_links, parse_front_matter, parse_quizzes};

/// Parse one document's text into a [`Document`].
///
/// `path` is the document's path relative to the corpus root. Front matter
/// defects do not stop quiz and link parsing; everything found is recorded
/// in [`Document::diagnostics`].
///
/// # Example
///
/// ```rust
/// use quizmark_content::parse_document;
///
/// let text = "---\ntitle: Loops\nweight: 20\n---\n\nSee [intro](intro.md).\n";
/// let doc = parse_document("part-1/loops.md", text);
///
/// assert_eq!(doc.nav_weight(), Some(20));
/// assert_eq!(doc.links[0].line, 6);
/// assert!(doc.diagnostics.is_empty());
/// ```
pub fn parse_document(path: impl Into<PathBuf>, text: &str) -> Document {
    let path = path.into();
    let outcome = parse_front_matter(text);
    let quiz = parse_quizzes(outcome.body, outcome.body_line, &path);
    let links = extract_links(outcome.body, outcome.body_line);

    log::trace!(
        "Parsed {}: {} quiz block(s), {} link(s), {} front matter error(s)",
        path.display(),
        quiz.blocks.len(),
        links.len(),
        outcome.errors.len()
    );

    Document {
        path,
        front_matter: outcome.front_matter,
        quizzes: quiz.blocks,
        links,
        raw_body: outcome.body.to_string(),
        diagnostics: ParseDiagnostics {
            front_matter: outcome.errors,
            quiz: quiz.errors,
        },
    }
}
