//! Surfaces per-document parse errors as validation issues.

use quizmark_core::{Document, ValidationIssue};

use crate::Check;

/// Converts each document's front-matter and quiz errors into issues.
///
/// Severity comes from the error kind: quiz structure errors and
/// front-matter errors are `error`, a missing explanation, an empty quiz
/// block and an unrecognized date are `warning`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseDiagnosticsCheck;

impl Check for ParseDiagnosticsCheck {
    fn name(&self) -> &'static str {
        "parse-diagnostics"
    }

    fn check(&self, documents: &[&Document]) -> Vec<ValidationIssue> {
        documents
            .iter()
            .flat_map(|doc| {
                let front_matter = doc
                    .diagnostics
                    .front_matter
                    .iter()
                    .map(|err| err.to_issue(&doc.path));
                let quiz = doc
                    .diagnostics
                    .quiz
                    .iter()
                    .map(|err| err.to_issue(&doc.path));
                front_matter.chain(quiz)
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quizmark_content::parse_document;
    use quizmark_core::{IssueKind, Severity};

    fn run(docs: &[Document]) -> Vec<ValidationIssue> {
        let refs: Vec<&Document> = docs.iter().collect();
        ParseDiagnosticsCheck.check(&refs)
    }

    #[test]
    fn test_clean_document() {
        let doc = parse_document("a.md", "---\ntitle: A\nweight: 1\n---\n");
        assert!(run(&[doc]).is_empty());
    }

    #[test]
    fn test_quiz_errors_keep_severity_and_stem() {
        let text = "---\ntitle: A\nweight: 1\n---\n{{< quizdown >}}\n### Which two?\n- [x] a\n- [x] b\n\n### Why?\n- [x] a\n- [ ] b\n{{< /quizdown >}}\n";
        let issues = run(&[parse_document("ch.md", text)]);
        assert_eq!(issues.len(), 3);

        assert_eq!(issues[0].kind, IssueKind::AmbiguousCorrectness);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].location.line, Some(6));
        assert!(issues[0].message.contains("\"Which two?\""));

        assert_eq!(issues[1].kind, IssueKind::MissingExplanation);
        assert_eq!(issues[1].severity, Severity::Warning);

        assert_eq!(issues[2].kind, IssueKind::MissingExplanation);
        assert_eq!(issues[2].location.line, Some(10));
    }

    #[test]
    fn test_front_matter_errors_come_first() {
        let text = "---\ntitle: [not, a, string]\n---\n{{< quizdown >}}\n{{< /quizdown >}}\n";
        let issues = run(&[parse_document("ch.md", text)]);
        let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::InvalidType,
                IssueKind::MissingRequiredField,
                IssueKind::EmptyBlock
            ]
        );
        assert!(issues.iter().all(|i| i.document_path.to_str() == Some("ch.md")));
    }
}
