//! YAML front matter extraction and typed decoding.
//!
//! Front matter is metadata at the start of a chapter, delimited by `---`
//! lines:
//!
//! ```markdown
//! ---
//! title: Immutable Data Structures
//! canonical: https://clojureforjava.com/1/4/
//! tags:
//!   - immutability
//!   - collections
//! weight: 640000
//! ---
//!
//! # Body starts here
//! ```
//!
//! # Usage
//!
//! ```rust
//! use quizmark_content::markdown::parse_front_matter;
//!
//! let content = "---\ntitle: Test\nweight: 10\n---\n\nBody";
//! let outcome = parse_front_matter(content);
//!
//! let fm = outcome.front_matter.unwrap();
//! assert_eq!(fm.title, "Test");
//! assert_eq!(fm.nav_weight, 10);
//! assert_eq!(outcome.body.trim(), "Body");
//! assert_eq!(outcome.body_line, 5);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use quizmark_core::{FrontMatter, FrontMatterError, FrontMatterErrorKind, Severity};
use serde_yaml::{Mapping, Value};

/// Fence line opening and closing the front matter.
pub const FENCE: &str = "---";

const TITLE_KEYS: &[&str] = &["title"];
const WEIGHT_KEYS: &[&str] = &["weight", "nav_weight"];
const CANONICAL_KEYS: &[&str] = &["canonical", "canonical_url", "canonicalURL"];

// ============================================================================
// Splitting
// ============================================================================

/// Raw front matter and body of a document, before YAML decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// Text between the fences, if both were found.
    yaml: Option<&'a str>,
    /// Everything after the closing fence (or the whole document).
    body: &'a str,
    /// 1-based line of the first body line in the original document.
    body_line: usize,
    /// Whether the document opened with a fence.
    had_delimiters: bool,
}

impl<'a> FrontmatterSplit<'a> {
    fn without_frontmatter(content: &'a str) -> Self {
        Self {
            yaml: None,
            body: content,
            body_line: 1,
            had_delimiters: false,
        }
    }

    fn unterminated(content: &'a str) -> Self {
        Self {
            yaml: None,
            body: content,
            body_line: 1,
            had_delimiters: true,
        }
    }

    /// The YAML text between the fences.
    pub fn yaml(&self) -> Option<&'a str> {
        self.yaml
    }

    /// Body content after the front matter.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Line number of the first body line.
    pub fn body_line(&self) -> usize {
        self.body_line
    }

    /// Check if an opening fence was present (even without a closing one).
    pub fn had_delimiters(&self) -> bool {
        self.had_delimiters
    }

    /// Check if a complete fence pair was found.
    pub fn is_closed(&self) -> bool {
        self.yaml.is_some()
    }
}

/// Split a document into front matter and body.
///
/// The opening fence must be the first line. The closing fence is the next
/// line consisting of `---` alone. Without an opening fence, or without a
/// closing one, the whole document is treated as body.
///
/// # Example
///
/// ```rust
/// use quizmark_content::markdown::split_frontmatter;
///
/// let split = split_frontmatter("---\ntitle: A\n---\n# Heading\n");
/// assert_eq!(split.yaml(), Some("title: A\n"));
/// assert_eq!(split.body(), "# Heading\n");
/// assert_eq!(split.body_line(), 4);
/// ```
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return FrontmatterSplit::without_frontmatter(content);
    };
    if first.trim_end() != FENCE {
        return FrontmatterSplit::without_frontmatter(content);
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    let mut line_no = 1;

    for line in lines {
        line_no += 1;
        if line.trim_end() == FENCE {
            return FrontmatterSplit {
                yaml: Some(&content[yaml_start..offset]),
                body: &content[offset + line.len()..],
                body_line: line_no + 1,
                had_delimiters: true,
            };
        }
        offset += line.len();
    }

    log::warn!("Front matter opening fence found but no closing fence");
    FrontmatterSplit::unterminated(content)
}

/// Strip front matter, returning only the body.
///
/// ```rust
/// use quizmark_content::markdown::strip_frontmatter;
///
/// assert_eq!(strip_frontmatter("---\ntitle: T\n---\n# H").trim(), "# H");
/// assert_eq!(strip_frontmatter("# Just content"), "# Just content");
/// ```
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content).body()
}

// ============================================================================
// Typed decoding
// ============================================================================

/// Result of parsing a document's front matter.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatterOutcome<'a> {
    /// The decoded record; `None` if any error-severity defect was found.
    pub front_matter: Option<FrontMatter>,
    /// Every defect found, fatal or not.
    pub errors: Vec<FrontMatterError>,
    /// Body text following the front matter.
    pub body: &'a str,
    /// 1-based line of the first body line.
    pub body_line: usize,
}

impl FrontMatterOutcome<'_> {
    /// Whether decoding produced a record with no defects at all.
    pub fn is_clean(&self) -> bool {
        self.front_matter.is_some() && self.errors.is_empty()
    }
}

/// Locate, decode, and check a document's front matter.
///
/// Never fails outright: defects come back in
/// [`FrontMatterOutcome::errors`] and the body is always returned so the
/// quiz parser can still run.
pub fn parse_front_matter(content: &str) -> FrontMatterOutcome<'_> {
    let split = split_frontmatter(content);
    let outcome = |front_matter, errors| FrontMatterOutcome {
        front_matter,
        errors,
        body: split.body(),
        body_line: split.body_line(),
    };

    let yaml = match (split.had_delimiters(), split.yaml()) {
        (false, _) => return outcome(None, vec![FrontMatterError::missing()]),
        (true, None) => {
            let err = FrontMatterError::new(
                FrontMatterErrorKind::Malformed,
                "front matter has no closing `---` fence",
            )
            .at_line(1);
            return outcome(None, vec![err]);
        }
        (true, Some(yaml)) => yaml,
    };

    let value = match serde_yaml::from_str::<Value>(yaml) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Failed to parse front matter YAML: {e}");
            let mut err = FrontMatterError::new(
                FrontMatterErrorKind::Malformed,
                format!("front matter is not valid YAML: {e}"),
            );
            // Line 1 is the opening fence.
            err.line = Some(e.location().map(|loc| loc.line() + 1).unwrap_or(1));
            return outcome(None, vec![err]);
        }
    };

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        other => {
            let err = FrontMatterError::new(
                FrontMatterErrorKind::Malformed,
                format!(
                    "front matter must be a key-value mapping, found {}",
                    value_kind(&other)
                ),
            )
            .at_line(1);
            return outcome(None, vec![err]);
        }
    };

    let (front_matter, errors) = FieldReader::new(mapping, yaml).read();
    outcome(front_matter, errors)
}

/// Render front matter back into a fenced YAML block.
///
/// Parsing the result with [`parse_front_matter`] yields an equal record.
pub fn render_front_matter(front_matter: &FrontMatter) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(front_matter)?;
    Ok(format!("{FENCE}\n{yaml}{FENCE}\n"))
}

/// Pulls known fields out of the mapping, recording defects as it goes.
struct FieldReader<'a> {
    mapping: Mapping,
    yaml: &'a str,
    errors: Vec<FrontMatterError>,
}

impl<'a> FieldReader<'a> {
    fn new(mapping: Mapping, yaml: &'a str) -> Self {
        Self {
            mapping,
            yaml,
            errors: Vec::new(),
        }
    }

    fn read(mut self) -> (Option<FrontMatter>, Vec<FrontMatterError>) {
        let title = self.title();
        let nav_weight = self.nav_weight();
        let canonical_url = self.canonical_url();
        let description = self.optional_string(&["description"]);
        let tags = self.tags();
        let date = self.date();
        let doc_type = self.optional_string(&["type"]);
        let license = self.optional_string(&["license"]);
        let extra = self.remaining();

        let fatal = self
            .errors
            .iter()
            .any(|e| e.kind.severity() == Severity::Error);

        let front_matter = match (title, nav_weight) {
            (Some(title), Some(nav_weight)) if !fatal => Some(FrontMatter {
                title,
                nav_weight,
                canonical_url,
                description,
                tags,
                date,
                doc_type,
                license,
                extra,
            }),
            _ => None,
        };
        (front_matter, self.errors)
    }

    /// Remove the first present key among `keys`.
    fn take(&mut self, keys: &[&'static str]) -> Option<(&'static str, Value)> {
        keys.iter()
            .find_map(|key| self.mapping.remove(*key).map(|value| (*key, value)))
    }

    fn error(&mut self, err: FrontMatterError, key: &str) {
        let err = match self.line_of(key) {
            Some(line) => err.at_line(line),
            None => err.at_line(1),
        };
        self.errors.push(err);
    }

    /// Document line on which `key` is defined.
    fn line_of(&self, key: &str) -> Option<usize> {
        self.yaml.lines().position(|line| {
            line.strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with(':'))
        })
        // +1 for 1-based, +1 for the opening fence
        .map(|idx| idx + 2)
    }

    fn title(&mut self) -> Option<String> {
        match self.take(TITLE_KEYS) {
            None | Some((_, Value::Null)) => {
                self.errors.push(FrontMatterError::missing_field("title").at_line(1));
                None
            }
            Some((key, Value::String(s))) if s.trim().is_empty() => {
                self.error(
                    FrontMatterError::new(
                        FrontMatterErrorKind::MissingRequiredField,
                        "required field `title` is empty",
                    ),
                    key,
                );
                None
            }
            Some((_, Value::String(s))) => Some(s),
            Some((key, _)) => {
                self.error(FrontMatterError::invalid_type(key, "a string"), key);
                None
            }
        }
    }

    fn nav_weight(&mut self) -> Option<u64> {
        match self.take(WEIGHT_KEYS) {
            None | Some((_, Value::Null)) => {
                self.errors.push(FrontMatterError::missing_field("weight").at_line(1));
                None
            }
            Some((key, Value::Number(n))) => match n.as_u64() {
                Some(weight) if weight > 0 => Some(weight),
                _ => {
                    self.error(
                        FrontMatterError::invalid_type(key, "a positive integer")
                            .with_found(&n.to_string()),
                        key,
                    );
                    None
                }
            },
            Some((key, other)) => {
                self.error(
                    FrontMatterError::invalid_type(key, "a positive integer")
                        .with_found(value_kind(&other)),
                    key,
                );
                None
            }
        }
    }

    fn canonical_url(&mut self) -> Option<String> {
        match self.take(CANONICAL_KEYS) {
            None | Some((_, Value::Null)) => None,
            Some((_, Value::String(s))) if s.trim().is_empty() => None,
            Some((key, Value::String(s))) => {
                if is_absolute_url(&s) {
                    Some(s)
                } else {
                    self.error(
                        FrontMatterError::invalid_type(key, "an absolute http(s) URL")
                            .with_found(&format!("'{s}'")),
                        key,
                    );
                    None
                }
            }
            Some((key, other)) => {
                self.error(
                    FrontMatterError::invalid_type(key, "an absolute http(s) URL")
                        .with_found(value_kind(&other)),
                    key,
                );
                None
            }
        }
    }

    fn optional_string(&mut self, keys: &[&'static str]) -> Option<String> {
        match self.take(keys) {
            None | Some((_, Value::Null)) => None,
            Some((_, Value::String(s))) => Some(s),
            Some((key, other)) => {
                self.error(
                    FrontMatterError::invalid_type(key, "a string").with_found(value_kind(&other)),
                    key,
                );
                None
            }
        }
    }

    fn tags(&mut self) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        match self.take(&["tags"]) {
            None | Some((_, Value::Null)) => {}
            Some((_, Value::String(s))) => {
                if !s.trim().is_empty() {
                    tags.insert(s.trim().to_string());
                }
            }
            Some((key, Value::Sequence(items))) => {
                for item in items {
                    match scalar_to_string(&item) {
                        Some(tag) if !tag.trim().is_empty() => {
                            tags.insert(tag.trim().to_string());
                        }
                        Some(_) => {}
                        None => {
                            self.error(
                                FrontMatterError::invalid_type(key, "a list of strings")
                                    .with_found(&format!("a {} entry", value_kind(&item))),
                                key,
                            );
                        }
                    }
                }
            }
            Some((key, other)) => {
                self.error(
                    FrontMatterError::invalid_type(key, "a list of strings")
                        .with_found(value_kind(&other)),
                    key,
                );
            }
        }
        tags
    }

    fn date(&mut self) -> Option<String> {
        match self.take(&["date"]) {
            None | Some((_, Value::Null)) => None,
            Some((key, Value::String(s))) => {
                if !is_recognized_date(&s) {
                    self.error(
                        FrontMatterError::new(
                            FrontMatterErrorKind::InvalidDate,
                            format!("field `date` is not an RFC 3339 or YYYY-MM-DD date: '{s}'"),
                        ),
                        key,
                    );
                }
                Some(s)
            }
            Some((key, other)) => {
                self.error(
                    FrontMatterError::invalid_type(key, "a date string")
                        .with_found(value_kind(&other)),
                    key,
                );
                None
            }
        }
    }

    /// Everything not consumed by a known field.
    fn remaining(&mut self) -> BTreeMap<String, Value> {
        let mut extra = BTreeMap::new();
        for (key, value) in std::mem::take(&mut self.mapping) {
            match scalar_to_string(&key) {
                Some(key) => {
                    extra.insert(key, value);
                }
                None => {
                    let err = FrontMatterError::new(
                        FrontMatterErrorKind::UnsupportedKey,
                        format!(
                            "front matter entry with a {} key cannot be kept",
                            value_kind(&key)
                        ),
                    );
                    match key {
                        Value::Null => self.error(err, "~"),
                        _ => self.errors.push(err.at_line(1)),
                    }
                }
            }
        }
        extra
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn is_absolute_url(s: &str) -> bool {
    match url::Url::parse(s.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn is_recognized_date(s: &str) -> bool {
    let s = s.trim();
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

// ============================================================================
// Tests
// ============================================================================
