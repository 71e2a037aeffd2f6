//! Parsed document model.
//!
//! Every value here is built once per run by the content parsers and never
//! mutated afterwards. The model serializes to JSON for downstream site
//! generators; raw bodies and parse diagnostics are left out of that form.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;
use serde_yaml::Value;

use crate::issue::{FrontMatterError, QuizError};

/// Typed front matter of a single document.
///
/// Field names follow the Hugo conventions used in the corpus: the
/// navigation weight is stored under `weight` and the canonical URL under
/// `canonical`. Keys the parser does not know about are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    pub title: String,

    #[serde(rename = "weight")]
    pub nav_weight: u64,

    #[serde(rename = "canonical", skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Unknown keys, preserved as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FrontMatter {
    /// Create front matter with only the required fields set.
    pub fn new(title: impl Into<String>, nav_weight: u64) -> Self {
        Self {
            title: title.into(),
            nav_weight,
            canonical_url: None,
            description: None,
            tags: BTreeSet::new(),
            date: None,
            doc_type: None,
            license: None,
            extra: BTreeMap::new(),
        }
    }

    /// Returns the canonical URL if one is set and non-blank.
    pub fn canonical(&self) -> Option<&str> {
        self.canonical_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// One answer option of a quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOption {
    /// Option text with inline Markdown preserved.
    pub text: String,
    pub is_correct: bool,
}

impl QuizOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A multiple-choice question as written in the source.
///
/// Questions are recorded even when malformed; the matching
/// [`QuizError`]s say what is wrong with them. Nothing is corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    /// Heading text plus any continuation lines, joined with `\n`.
    pub stem: String,
    pub options: Vec<QuizOption>,
    /// Explanation blockquote lines joined with single spaces; empty if absent.
    pub explanation: String,
    /// 1-based line of the question heading in the source document.
    pub line: usize,
}

impl QuizQuestion {
    /// Number of options marked correct.
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }

    /// The single correct option, if exactly one is marked.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        match self.correct_count() {
            1 => self.options.iter().find(|o| o.is_correct),
            _ => None,
        }
    }

    /// Whether the question satisfies every structural rule: non-blank
    /// stem, two or more options, exactly one correct, an explanation.
    pub fn is_well_formed(&self) -> bool {
        !self.stem.trim().is_empty()
            && self.options.len() >= 2
            && self.correct_count() == 1
            && !self.explanation.trim().is_empty()
    }
}

/// A delimited quiz region of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizBlock {
    pub document_path: PathBuf,
    /// 1-based line of the opening marker.
    pub line: usize,
    pub questions: Vec<QuizQuestion>,
}

/// How a link was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// `[text](target)` or an autolink.
    Markdown,
    /// `{{< ref "target" >}}`
    Ref,
    /// `{{< relref "target" >}}`
    RelRef,
}

/// A link found in a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub target: String,
    pub kind: LinkKind,
    /// 1-based line in the source document.
    pub line: usize,
}

/// Everything the parsers reported about one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseDiagnostics {
    pub front_matter: Vec<FrontMatterError>,
    pub quiz: Vec<QuizError>,
}

impl ParseDiagnostics {
    pub fn is_empty(&self) -> bool {
        self.front_matter.is_empty() && self.quiz.is_empty()
    }
}

/// A parsed Markdown document.
///
/// `front_matter` is `None` when the front matter was missing or invalid;
/// the reason is in `diagnostics`. Quizzes and links are still parsed in
/// that case whenever a body could be separated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Path relative to the corpus root.
    pub path: PathBuf,
    pub front_matter: Option<FrontMatter>,
    pub quizzes: Vec<QuizBlock>,
    pub links: Vec<Link>,
    #[serde(skip)]
    pub raw_body: String,
    #[serde(skip)]
    pub diagnostics: ParseDiagnostics,
}

impl Document {
    /// Navigation weight, if the front matter parsed.
    pub fn nav_weight(&self) -> Option<u64> {
        self.front_matter.as_ref().map(|fm| fm.nav_weight)
    }

    /// Canonical URL, if the front matter parsed and declares one.
    pub fn canonical_url(&self) -> Option<&str> {
        self.front_matter.as_ref().and_then(FrontMatter::canonical)
    }

    /// All questions across every quiz block, in source order.
    pub fn questions(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.quizzes.iter().flat_map(|q| q.questions.iter())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn question(options: &[(&str, bool)], explanation: &str) -> QuizQuestion {
        QuizQuestion {
            stem: "What does `conj` return?".to_string(),
            options: options
                .iter()
                .map(|(text, ok)| QuizOption::new(*text, *ok))
                .collect(),
            explanation: explanation.to_string(),
            line: 3,
        }
    }

    #[test]
    fn test_correct_option_single() {
        let q = question(&[("A new collection", true), ("nil", false)], "Persistent.");
        assert_eq!(q.correct_count(), 1);
        assert_eq!(q.correct_option().unwrap().text, "A new collection");
        assert!(q.is_well_formed());
    }

    #[test]
    fn test_correct_option_ambiguous() {
        let q = question(&[("A", true), ("B", true)], "Both?");
        assert_eq!(q.correct_count(), 2);
        assert!(q.correct_option().is_none());
        assert!(!q.is_well_formed());
    }

    #[test]
    fn test_not_well_formed_without_explanation() {
        let q = question(&[("A", true), ("B", false)], "   ");
        assert!(!q.is_well_formed());
    }

    #[test]
    fn test_canonical_ignores_blank() {
        let mut fm = FrontMatter::new("Intro", 10);
        fm.canonical_url = Some("   ".to_string());
        assert_eq!(fm.canonical(), None);
        fm.canonical_url = Some("https://example.com/intro/".to_string());
        assert_eq!(fm.canonical(), Some("https://example.com/intro/"));
    }

    #[test]
    fn test_document_serialization_skips_body() {
        let doc = Document {
            path: PathBuf::from("part-1/intro.md"),
            front_matter: Some(FrontMatter::new("Intro", 10)),
            quizzes: vec![],
            links: vec![],
            raw_body: "secret body".to_string(),
            diagnostics: ParseDiagnostics::default(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["path"], "part-1/intro.md");
        assert_eq!(json["front_matter"]["weight"], 10);
        assert!(json.get("raw_body").is_none());
        assert!(json.get("diagnostics").is_none());
    }
}
