//! Link extraction.
//!
//! Two link forms are collected from a document body:
//!
//! - Markdown links (`[text](target)`, reference links, autolinks), via
//!   `pulldown-cmark`. Images are not links.
//! - Hugo `ref` / `relref` shortcodes, via a regex, skipping fenced and
//!   indented code blocks.
//!
//! Every link is kept as written; deciding which ones point into the
//! corpus is left to the validator.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use quizmark_core::{Link, LinkKind};
use regex::Regex;

static REF_SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{[<%]\s*(ref|relref)\s+"([^"]*)"\s*[>%]\}\}"#)
        .expect("Invalid ref shortcode regex")
});

/// Extract every link from `body`, ordered by position.
///
/// `first_line` is the 1-based document line on which `body` starts.
///
/// # Example
///
/// ```rust
/// use quizmark_content::markdown::extract_links;
/// use quizmark_core::LinkKind;
///
/// let body = "See [loops](../part-2/loops.md).\n\nAlso {{< relref \"intro.md\" >}}.\n";
/// let links = extract_links(body, 5);
///
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].target, "../part-2/loops.md");
/// assert_eq!(links[0].line, 5);
/// assert_eq!(links[1].kind, LinkKind::RelRef);
/// assert_eq!(links[1].line, 7);
/// ```
pub fn extract_links(body: &str, first_line: usize) -> Vec<Link> {
    let lines = LineIndex::new(body);
    let mut found: Vec<(usize, Link)> = Vec::new();
    let mut code_blocks: Vec<Range<usize>> = Vec::new();
    let mut code_start: Option<usize> = None;

    for (event, range) in Parser::new_ext(body, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                let target = dest_url.trim();
                if target.is_empty() || target.starts_with("{{") {
                    continue;
                }
                found.push((
                    range.start,
                    Link {
                        target: target.to_string(),
                        kind: LinkKind::Markdown,
                        line: first_line + lines.line_of(range.start),
                    },
                ));
            }
            Event::Start(Tag::CodeBlock(_)) => code_start = Some(range.start),
            Event::End(TagEnd::CodeBlock) => {
                if let Some(start) = code_start.take() {
                    code_blocks.push(start..range.end);
                }
            }
            _ => {}
        }
    }

    for caps in REF_SHORTCODE.captures_iter(body) {
        let (Some(whole), Some(name), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if code_blocks.iter().any(|r| r.contains(&whole.start())) {
            continue;
        }
        let kind = if name.as_str() == "ref" {
            LinkKind::Ref
        } else {
            LinkKind::RelRef
        };
        found.push((
            whole.start(),
            Link {
                target: target.as_str().trim().to_string(),
                kind,
                line: first_line + lines.line_of(whole.start()),
            },
        ));
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, link)| link).collect()
}

/// Byte offsets of line starts, for offset-to-line lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 0-based line containing byte `offset`.
    fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }
}
