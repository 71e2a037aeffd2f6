//! Property-based tests for the content parsers.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use crate::markdown::{parse_front_matter, parse_quizzes, render_front_matter};
    use proptest::prelude::*;
    use quizmark_core::{FrontMatter, QuizErrorKind};

    fn option_line(correct: bool, text: &str) -> String {
        format!("- [{}] {}", if correct { "x" } else { " " }, text)
    }

    proptest! {
        #[test]
        fn test_front_matter_render_parse_roundtrip(
            title in "[A-Za-z][A-Za-z0-9 ]{0,30}[A-Za-z0-9]",
            weight in 1u64..10_000_000,
            tags in prop::collection::btree_set("[a-z][a-z-]{0,10}", 0..4),
        ) {
            let mut fm = FrontMatter::new(title, weight);
            fm.tags = tags;
            let text = format!("{}\nBody\n", render_front_matter(&fm).unwrap());
            let outcome = parse_front_matter(&text);
            prop_assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
            prop_assert_eq!(outcome.front_matter.unwrap(), fm);
        }

        #[test]
        fn test_correct_count_matches_markers(marks in prop::collection::vec(any::<bool>(), 0..6)) {
            let mut body = String::from("{{< quizdown >}}\n### Pick\n");
            for (i, correct) in marks.iter().enumerate() {
                body.push_str(&option_line(*correct, &format!("option {i}")));
                body.push('\n');
            }
            body.push_str("> **Explanation:** because.\n{{< /quizdown >}}\n");

            let parsed = parse_quizzes(&body, 1, Path::new("p.md"));
            let question = &parsed.blocks[0].questions[0];
            let expected = marks.iter().filter(|m| **m).count();
            prop_assert_eq!(question.options.len(), marks.len());
            prop_assert_eq!(question.correct_count(), expected);

            let ambiguous = parsed
                .errors
                .iter()
                .any(|e| e.kind == QuizErrorKind::AmbiguousCorrectness);
            prop_assert_eq!(ambiguous, !marks.is_empty() && expected != 1);
        }

        #[test]
        fn test_prose_outside_quiz_never_yields_blocks(prose in "[A-Za-z0-9 .,#\\-\\[\\]\n]{0,200}") {
            let parsed = parse_quizzes(&prose, 1, Path::new("p.md"));
            prop_assert!(parsed.blocks.is_empty());
            prop_assert!(parsed.errors.is_empty());
        }
    }
}
