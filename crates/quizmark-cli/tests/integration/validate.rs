//! `quizmark validate` end to end.

use crate::common::{
    chapter, json, quizmark, stderr, stdout, Corpus, QUESTION_NO_EXPLANATION, QUESTION_OK,
    QUESTION_TWO_CORRECT,
};

// ------------------------------------------------------------------------
// Clean corpus
// ------------------------------------------------------------------------

#[test]
fn test_clean_corpus_json_is_empty_array() {
    let corpus = Corpus::new();
    corpus.chapter("part-1/intro.md", "Intro", 10);
    corpus.chapter("part-1/loops.md", "Loops", 20);

    let output = corpus.run(&["validate", "{root}", "--format=json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(json(&output), serde_json::json!([]));
}

#[test]
fn test_clean_corpus_text_summary() {
    let corpus = Corpus::new();
    corpus.chapter("intro.md", "Intro", 10);

    let output = corpus.run(&["validate", "{root}"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "0 error(s), 0 warning(s) in 1 document(s)\n");
}

#[test]
fn test_empty_directory_is_clean() {
    let corpus = Corpus::new();
    let output = corpus.run(&["validate", "{root}", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json(&output), serde_json::json!([]));
}

// ------------------------------------------------------------------------
// Duplicates
// ------------------------------------------------------------------------

#[test]
fn test_duplicate_weight_one_error_naming_both() {
    let corpus = Corpus::new();
    corpus.chapter("part-1/a.md", "A", 640000);
    corpus.chapter("part-2/b.md", "B", 640000);

    let output = corpus.run(&["validate", "{root}", "--format=json"]);
    assert_eq!(output.status.code(), Some(1));

    let issues = json(&output);
    let issues = issues.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["kind"], "duplicate-nav-weight");
    assert_eq!(issues[0]["severity"], "error");
    let message = issues[0]["message"].as_str().unwrap();
    assert!(message.contains("part-1/a.md"));
    assert!(message.contains("part-2/b.md"));
}

#[test]
fn test_duplicate_severity_from_config_file() {
    let corpus = Corpus::new();
    corpus.chapter("a.md", "A", 5);
    corpus.chapter("b.md", "B", 5);
    corpus.write("quizmark.toml", "[validate]\nduplicate_severity = \"warning\"\n");

    let output = corpus.run(&["validate", "{root}"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("warning[duplicate-nav-weight] b.md: "));
}

// ------------------------------------------------------------------------
// Quiz errors and --fail-on
// ------------------------------------------------------------------------

#[test]
fn test_missing_explanation_respects_fail_on() {
    let corpus = Corpus::new();
    corpus.write(
        "ch.md",
        &chapter("Seqs", 10, &format!("{QUESTION_OK}\n{QUESTION_NO_EXPLANATION}")),
    );

    let default = corpus.run(&["validate", "{root}"]);
    assert_eq!(default.status.code(), Some(0));
    let text = stdout(&default);
    assert!(text.contains("warning[missing-explanation] ch.md:"));
    assert!(text.contains("(question \"What does `(first [])` return?\")"));
    assert!(text.ends_with("0 error(s), 1 warning(s) in 1 document(s)\n"));

    let on_error = corpus.run(&["validate", "{root}", "--fail-on=error"]);
    assert_eq!(on_error.status.code(), Some(0));

    let on_warning = corpus.run(&["validate", "{root}", "--fail-on=warning"]);
    assert_eq!(on_warning.status.code(), Some(1));
}

#[test]
fn test_two_correct_reported_and_siblings_parsed() {
    let corpus = Corpus::new();
    corpus.write(
        "ch.md",
        &chapter(
            "Collections",
            10,
            &format!("{QUESTION_OK}\n{QUESTION_TWO_CORRECT}\n{QUESTION_OK}"),
        ),
    );

    let output = corpus.run(&["validate", "{root}", "--format=json"]);
    assert_eq!(output.status.code(), Some(1));
    let issues = json(&output);
    let issues = issues.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["kind"], "ambiguous-correctness");

    let export = corpus.run(&["export", "{root}"]);
    let docs = json(&export);
    assert_eq!(docs[0]["quizzes"][0]["questions"].as_array().unwrap().len(), 3);
}

// ------------------------------------------------------------------------
// Per-document failures
// ------------------------------------------------------------------------

#[test]
fn test_bad_front_matter_and_broken_link() {
    let corpus = Corpus::new();
    corpus.chapter("intro.md", "Intro", 10);
    corpus.write(
        "broken.md",
        "---\ntitle: Broken\nweight: ten\n---\n\nSee [intro](intro.md) and [gone](gone.md).\n",
    );

    let output = corpus.run(&["validate", "{root}"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("error[invalid-type] broken.md:3: "));
    assert!(text.contains("warning[broken-link] broken.md:6: "));
    assert!(!text.contains("intro.md\" does not match"));

    let no_links = corpus.run(&["validate", "{root}", "--no-links"]);
    assert!(!stdout(&no_links).contains("broken-link"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_does_not_abort() {
    let corpus = Corpus::new();
    corpus.chapter("good.md", "Good", 10);
    corpus.write("bad.md", "");
    std::fs::write(corpus.root().join("bad.md"), [0xff, 0xfe, 0xfd]).unwrap();

    let output = corpus.run(&["validate", "{root}", "--format=json"]);
    assert_eq!(output.status.code(), Some(1));
    let issues = json(&output);
    let issues = issues.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["kind"], "io-error");
    assert_eq!(issues[0]["document_path"], "bad.md");
}

// ------------------------------------------------------------------------
// Invocation failures
// ------------------------------------------------------------------------

#[test]
fn test_missing_root_exits_2() {
    let corpus = Corpus::new();
    let missing = corpus.root().join("does-not-exist");
    let output = quizmark(&["validate".as_ref(), missing.as_os_str()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("not found"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_bad_config_exits_2() {
    let corpus = Corpus::new();
    corpus.chapter("a.md", "A", 1);
    corpus.write("quizmark.toml", "[loader]\nconcurrency = 0\n");
    let output = corpus.run(&["validate", "{root}"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_format_exits_2() {
    let corpus = Corpus::new();
    let output = corpus.run(&["validate", "{root}", "--format=yaml"]);
    assert_eq!(output.status.code(), Some(2));
}
