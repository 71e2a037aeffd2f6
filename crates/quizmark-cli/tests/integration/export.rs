//! `quizmark export` end to end.

use crate::common::{chapter, json, stderr, Corpus, QUESTION_OK, QUESTION_TWO_CORRECT};

#[test]
fn test_export_sorted_documents_without_body() {
    let corpus = Corpus::new();
    corpus.chapter("part-2/loops.md", "Loops", 20);
    corpus.chapter("part-1/intro.md", "Intro", 10);

    let output = corpus.run(&["export", "{root}"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let docs = json(&output);
    let docs = docs.as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["path"], "part-1/intro.md");
    assert_eq!(docs[1]["path"], "part-2/loops.md");

    let intro = &docs[0];
    assert_eq!(intro["front_matter"]["title"], "Intro");
    assert_eq!(intro["front_matter"]["weight"], 10);
    assert_eq!(intro["front_matter"]["tags"], serde_json::json!(["clojure"]));
    assert!(intro.get("raw_body").is_none());

    let question = &intro["quizzes"][0]["questions"][0];
    assert_eq!(question["options"][1]["text"], "`conj`");
    assert_eq!(question["options"][1]["is_correct"], true);
}

#[test]
fn test_export_to_file() {
    let corpus = Corpus::new();
    corpus.chapter("intro.md", "Intro", 10);
    let out = corpus.root().join("out").join("model.json");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();

    let output = corpus.run(&["export", "{root}", "--output", out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 1);
}

#[test]
fn test_export_strict_fails_on_errors() {
    let corpus = Corpus::new();
    corpus.write("ch.md", &chapter("Bad", 10, QUESTION_TWO_CORRECT));

    let lenient = corpus.run(&["export", "{root}"]);
    assert_eq!(lenient.status.code(), Some(0));
    assert!(stderr(&lenient).contains("1 error(s)"));

    let strict = corpus.run(&["export", "{root}", "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("error[ambiguous-correctness] ch.md:"));
}

#[test]
fn test_export_strict_passes_clean_corpus() {
    let corpus = Corpus::new();
    corpus.write("ch.md", &chapter("Good", 10, QUESTION_OK));
    let output = corpus.run(&["export", "{root}", "--strict"]);
    assert_eq!(output.status.code(), Some(0));
}
