//! Quiz block parsing.
//!
//! Quizzes are written with the Hugo `quizdown` shortcode:
//!
//! ```markdown
//! {{< quizdown >}}
//!
//! ### Which function returns a new vector with an element added?
//!
//! - [ ] `assoc-in`
//! - [x] `conj`
//! - [ ] `disj`
//!
//! > **Explanation:** `conj` adds to the end of a vector and
//! > returns a new persistent vector.
//!
//! {{< /quizdown >}}
//! ```
//!
//! The body is scanned line by line by a small state machine. Outside a
//! quiz region everything is opaque. Inside, a `###` heading opens a
//! question, `- [ ]` / `- [x]` lines are options, and a blockquote starting
//! with `**Explanation:**` (plus any directly following blockquote lines)
//! is the explanation. Fenced code is never interpreted.
//!
//! Malformed questions are kept as written and reported as [`QuizError`]s;
//! a bad question never stops its siblings from being parsed.

use std::path::Path;
use std::sync::LazyLock;

use quizmark_core::{QuizBlock, QuizError, QuizErrorKind, QuizOption, QuizQuestion};
use regex::Regex;

/// Heading marker that opens a question.
pub const QUESTION_MARKER: &str = "###";

static QUIZ_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{\{[<%]\s*quizdown(?:\s[^}]*)?\s*[>%]\}\}\s*$")
        .expect("Invalid quiz start regex")
});

static QUIZ_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{\{[<%]\s*/\s*quizdown\s*[>%]\}\}\s*$").expect("Invalid quiz end regex")
});

static OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*+]\s+\[([ xX])\]\s?(.*)$").expect("Invalid quiz option regex")
});

static EXPLANATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*>\s*\*\*\s*explanation\s*:?\s*\*\*\s*:?\s*(.*)$")
        .expect("Invalid explanation regex")
});

static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s?(.*)$").expect("Invalid blockquote regex"));

/// Quiz blocks and defects found in one document body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizParse {
    pub blocks: Vec<QuizBlock>,
    pub errors: Vec<QuizError>,
}

impl QuizParse {
    /// Total number of questions across all blocks.
    pub fn question_count(&self) -> usize {
        self.blocks.iter().map(|b| b.questions.len()).sum()
    }
}

/// Parse every quiz region in `body`.
///
/// `first_line` is the 1-based document line on which `body` starts, so
/// reported line numbers point into the original file.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use quizmark_content::markdown::parse_quizzes;
///
/// let body = "{{< quizdown >}}\n### Pick one\n- [x] a\n- [ ] b\n> **Explanation:** a.\n{{< /quizdown >}}\n";
/// let parsed = parse_quizzes(body, 1, Path::new("ch1.md"));
///
/// assert!(parsed.errors.is_empty());
/// assert_eq!(parsed.blocks[0].questions[0].explanation, "a.");
/// ```
pub fn parse_quizzes(body: &str, first_line: usize, document_path: &Path) -> QuizParse {
    let mut scanner = Scanner::new(document_path);
    for (idx, line) in body.lines().enumerate() {
        scanner.feed(line, first_line + idx);
    }
    scanner.finish()
}

// ============================================================================
// Line classification
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    QuizStart,
    QuizEnd,
    Fence(&'a str),
    Heading(&'a str),
    Option { checked: bool, text: &'a str },
    Explanation(&'a str),
    Blockquote(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some(marker) = fence_marker(trimmed) {
        return Line::Fence(marker);
    }
    if QUIZ_START.is_match(line) {
        return Line::QuizStart;
    }
    if QUIZ_END.is_match(line) {
        return Line::QuizEnd;
    }
    if let Some(rest) = trimmed.strip_prefix(QUESTION_MARKER) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Line::Heading(rest.trim());
        }
    }
    if let Some(caps) = OPTION.captures(line) {
        let checked = caps.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case("x"));
        let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        return Line::Option { checked, text };
    }
    if let Some(caps) = EXPLANATION.captures(line) {
        return Line::Explanation(caps.get(1).map(|m| m.as_str().trim()).unwrap_or(""));
    }
    if let Some(caps) = BLOCKQUOTE.captures(line) {
        return Line::Blockquote(caps.get(1).map(|m| m.as_str().trim()).unwrap_or(""));
    }
    Line::Text(line.trim_end())
}

/// Backtick or tilde run opening/closing a fenced code block.
fn fence_marker(trimmed: &str) -> Option<&str> {
    for ch in ['`', '~'] {
        let run = trimmed.len() - trimmed.trim_start_matches(ch).len();
        if run >= 3 {
            return Some(&trimmed[..run]);
        }
    }
    None
}

// ============================================================================
// State machine
// ============================================================================

/// Where the scanner is within the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Opaque Markdown between quiz regions.
    Outside,
    /// Inside a quiz region, before the first question.
    InQuiz,
    /// Inside the `---` options header some quizdown regions start with.
    InQuizHeader,
    /// Inside a question.
    InQuestion(Phase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// After the heading, before any option.
    Stem,
    /// Reading option lines.
    Options,
    /// Reading contiguous explanation blockquote lines.
    Explanation,
    /// After the explanation ended.
    Trailing,
}

struct OpenBlock {
    line: usize,
    questions: Vec<QuizQuestion>,
}

struct OpenQuestion {
    line: usize,
    stem: Vec<String>,
    options: Vec<QuizOption>,
    explanation: Vec<String>,
    has_explanation: bool,
}

impl OpenQuestion {
    fn new(line: usize, heading: &str) -> Self {
        Self {
            line,
            stem: vec![heading.to_string()],
            options: Vec::new(),
            explanation: Vec::new(),
            has_explanation: false,
        }
    }

    fn push_explanation(&mut self, text: &str) {
        self.has_explanation = true;
        if !text.is_empty() {
            self.explanation.push(text.to_string());
        }
    }
}

struct Scanner<'p> {
    document_path: &'p Path,
    state: State,
    /// Marker of the currently open code fence.
    fence: Option<String>,
    block: Option<OpenBlock>,
    question: Option<OpenQuestion>,
    result: QuizParse,
}

impl<'p> Scanner<'p> {
    fn new(document_path: &'p Path) -> Self {
        Self {
            document_path,
            state: State::Outside,
            fence: None,
            block: None,
            question: None,
            result: QuizParse::default(),
        }
    }

    fn feed(&mut self, raw: &str, line_no: usize) {
        let line = classify(raw);

        if let Some(open) = &self.fence {
            if let Line::Fence(marker) = line {
                if marker.starts_with(open.as_str()) {
                    self.fence = None;
                }
            }
            self.stem_verbatim(raw);
            return;
        }

        match self.state {
            State::Outside => self.feed_outside(line, line_no),
            State::InQuizHeader => match line {
                Line::QuizStart | Line::QuizEnd | Line::Heading(_) | Line::Option { .. } => {
                    // The opening `---` was a rule, not a header.
                    self.state = State::InQuiz;
                    self.feed_quiz(line, raw, line_no);
                }
                _ if raw.trim() == "---" => self.state = State::InQuiz,
                _ => {}
            },
            State::InQuiz | State::InQuestion(_) => self.feed_quiz(line, raw, line_no),
        }
    }

    fn feed_outside(&mut self, line: Line<'_>, line_no: usize) {
        match line {
            Line::Fence(marker) => self.fence = Some(marker.to_string()),
            Line::QuizStart => self.open_block(line_no),
            Line::QuizEnd => {
                log::debug!("{}:{line_no}: quiz end marker outside a quiz", self.path());
            }
            _ => {}
        }
    }

    fn feed_quiz(&mut self, line: Line<'_>, raw: &str, line_no: usize) {
        match line {
            Line::QuizEnd => {
                self.close_question();
                self.close_block();
                self.state = State::Outside;
            }
            Line::QuizStart => {
                self.unterminated();
                self.close_question();
                self.close_block();
                self.open_block(line_no);
            }
            Line::Heading(text) => {
                self.close_question();
                self.question = Some(OpenQuestion::new(line_no, text));
                self.state = State::InQuestion(Phase::Stem);
            }
            Line::Option { checked, text } => {
                let question = self
                    .question
                    .get_or_insert_with(|| OpenQuestion::new(line_no, ""));
                question.options.push(QuizOption::new(text, checked));
                self.state = State::InQuestion(Phase::Options);
            }
            Line::Explanation(text) => {
                if let Some(question) = self.question.as_mut() {
                    question.push_explanation(text);
                    self.state = State::InQuestion(Phase::Explanation);
                } else {
                    log::debug!(
                        "{}:{line_no}: explanation outside any question",
                        self.path()
                    );
                }
            }
            Line::Blockquote(text) => match self.state {
                State::InQuestion(Phase::Explanation) => {
                    if let Some(question) = self.question.as_mut() {
                        question.push_explanation(text);
                    }
                }
                State::InQuestion(Phase::Stem) => self.stem_verbatim(raw),
                _ => log::debug!("{}:{line_no}: ignoring blockquote line", self.path()),
            },
            Line::Blank => {
                if self.state == State::InQuestion(Phase::Explanation) {
                    self.state = State::InQuestion(Phase::Trailing);
                }
            }
            Line::Fence(marker) => {
                self.fence = Some(marker.to_string());
                self.stem_verbatim(raw);
            }
            Line::Text(text) => match self.state {
                State::InQuiz if self.question.is_none() && raw.trim() == "---" => {
                    self.state = State::InQuizHeader;
                }
                State::InQuestion(Phase::Stem) => self.stem_verbatim(raw),
                State::InQuestion(Phase::Options) if raw.starts_with(char::is_whitespace) => {
                    if let Some(option) = self
                        .question
                        .as_mut()
                        .and_then(|q| q.options.last_mut())
                    {
                        option.text.push(' ');
                        option.text.push_str(text.trim());
                    }
                }
                _ => log::debug!("{}:{line_no}: ignoring line inside quiz", self.path()),
            },
        }
    }

    /// Append a raw line to the stem while the question is still in its
    /// stem phase.
    fn stem_verbatim(&mut self, raw: &str) {
        if self.state != State::InQuestion(Phase::Stem) {
            return;
        }
        if let Some(question) = self.question.as_mut() {
            question.stem.push(raw.trim_end().to_string());
        }
    }

    fn open_block(&mut self, line_no: usize) {
        self.block = Some(OpenBlock {
            line: line_no,
            questions: Vec::new(),
        });
        self.state = State::InQuiz;
    }

    fn unterminated(&mut self) {
        if let Some(block) = &self.block {
            self.result.errors.push(QuizError::new(
                QuizErrorKind::UnterminatedBlock,
                block.line,
                "",
                "quiz block is never closed with `{{< /quizdown >}}`",
            ));
        }
    }

    fn close_question(&mut self) {
        let Some(open) = self.question.take() else {
            return;
        };

        let stem = trim_stem(open.stem);
        let question = QuizQuestion {
            stem,
            options: open.options,
            explanation: open.explanation.join(" "),
            line: open.line,
        };

        for (kind, message) in check_question(&question, open.has_explanation) {
            self.result
                .errors
                .push(QuizError::new(kind, question.line, &question.stem, message));
        }

        match self.block.as_mut() {
            Some(block) => block.questions.push(question),
            None => log::debug!("{}: question outside a quiz block", self.path()),
        }
    }

    fn close_block(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };
        if block.questions.is_empty() {
            self.result.errors.push(QuizError::new(
                QuizErrorKind::EmptyBlock,
                block.line,
                "",
                "quiz block contains no questions",
            ));
        }
        self.result.blocks.push(QuizBlock {
            document_path: self.document_path.to_path_buf(),
            line: block.line,
            questions: block.questions,
        });
    }

    fn finish(mut self) -> QuizParse {
        if self.state != State::Outside {
            self.unterminated();
            self.close_question();
            self.close_block();
        }
        self.result
    }

    fn path(&self) -> std::path::Display<'_> {
        self.document_path.display()
    }
}

/// Drop blank continuation lines and join the rest with `\n`.
fn trim_stem(lines: Vec<String>) -> String {
    let mut lines: Vec<String> = lines
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .collect();
    if let Some(first) = lines.first_mut() {
        *first = first.trim().to_string();
    }
    lines.join("\n")
}

/// Structural rules every question must satisfy.
fn check_question(question: &QuizQuestion, has_explanation: bool) -> Vec<(QuizErrorKind, String)> {
    let mut problems = Vec::new();

    if question.stem.trim().is_empty() {
        problems.push((QuizErrorKind::EmptyStem, "question stem is empty".to_string()));
    }

    let option_count = question.options.len();
    if option_count < 2 {
        problems.push((
            QuizErrorKind::InsufficientOptions,
            format!("question has {option_count} option(s), at least 2 are required"),
        ));
    }

    let correct = question.correct_count();
    if option_count > 0 && correct != 1 {
        let message = if correct == 0 {
            "no option is marked correct with `[x]`".to_string()
        } else {
            format!("{correct} options are marked correct, exactly 1 is required")
        };
        problems.push((QuizErrorKind::AmbiguousCorrectness, message));
    }

    if !has_explanation || question.explanation.trim().is_empty() {
        problems.push((
            QuizErrorKind::MissingExplanation,
            "question has no `> **Explanation:**` line".to_string(),
        ));
    }

    problems
}

// ============================================================================
// Tests
// ============================================================================
