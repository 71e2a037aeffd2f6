//! Markdown parsing for book chapters.
//!
//! - [`frontmatter`]: YAML front matter splitting and typed decoding
//! - [`quiz`]: `quizdown` quiz block parsing
//! - [`links`]: Markdown link and `ref`/`relref` shortcode extraction
//!
//! All parsers take the document text (or body) and return values plus
//! collected defects. None of them fail on bad input.

pub mod frontmatter;
pub mod links;
pub mod quiz;

// Re-export key types and functions
pub use frontmatter::{
    parse_front_matter, render_front_matter, split_frontmatter, strip_frontmatter,
    FrontMatterOutcome, FrontmatterSplit,
};
pub use links::extract_links;
pub use quiz::{parse_quizzes, QuizParse};
