//! Document loading and Markdown parsing for quizmark.
//!
//! This crate turns a directory of Markdown chapters into
//! [`Document`](quizmark_core::Document) values. It reports per-document
//! defects as data and never fails on bad content.
//!
//! # Modules
//!
//! - [`markdown`]: Front matter, quiz block, and link parsing
//!   - [`markdown::frontmatter`]: YAML front matter splitting and decoding
//!   - [`markdown::quiz`]: `quizdown` quiz block parsing
//!   - [`markdown::links`]: Link and shortcode extraction
//! - [`document`]: Whole-document parsing
//! - [`loader`]: Directory walking and concurrent loading
//!
//! # Example
//!
//! ```rust
//! use quizmark_content::parse_document;
//!
//! let text = "---\ntitle: Intro\nweight: 10\n---\n\n{{< quizdown >}}\n### Q\n- [x] a\n- [ ] b\n> **Explanation:** a.\n{{< /quizdown >}}\n";
//! let doc = parse_document("intro.md", text);
//!
//! assert_eq!(doc.front_matter.as_ref().unwrap().title, "Intro");
//! assert_eq!(doc.questions().count(), 1);
//! assert!(doc.diagnostics.is_empty());
//! ```

pub mod document;
pub mod loader;
pub mod markdown;

mod proptests;

// Re-export commonly used types
pub use document::parse_document;
pub use loader::{find_documents, load_document, load_documents, Discovery, Loaded};
pub use markdown::{
    extract_links, parse_front_matter, parse_quizzes, render_front_matter, split_frontmatter,
    strip_frontmatter, FrontMatterOutcome, FrontmatterSplit, QuizParse,
};
