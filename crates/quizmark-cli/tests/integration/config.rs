//! `quizmark config` end to end.

use crate::common::{stdout, Corpus};

#[test]
fn test_config_init_then_show() {
    let corpus = Corpus::new();

    let init = corpus.run(&["config", "init", "{root}"]);
    assert_eq!(init.status.code(), Some(0));
    assert!(corpus.root().join("quizmark.toml").is_file());

    let again = corpus.run(&["config", "init", "{root}"]);
    assert_eq!(again.status.code(), Some(2));

    let forced = corpus.run(&["config", "init", "{root}", "--force"]);
    assert_eq!(forced.status.code(), Some(0));

    let show = corpus.run(&["config", "show", "{root}"]);
    assert_eq!(show.status.code(), Some(0));
    let text = stdout(&show);
    assert!(text.contains("[loader]"));
    assert!(text.contains("duplicate_severity = \"error\""));
    assert!(text.contains("fail_on = \"error\""));
}

#[test]
fn test_explicit_config_flag() {
    let corpus = Corpus::new();
    let path = corpus.write("custom.toml", "[report]\nformat = \"json\"\n");
    let output = corpus.run(&["--config", path.to_str().unwrap(), "config", "show", "{root}"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("format = \"json\""));
}

#[test]
fn test_config_format_used_by_validate() {
    let corpus = Corpus::new();
    corpus.write("quizmark.toml", "[report]\nformat = \"json\"\n");
    let output = corpus.run(&["validate", "{root}"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "[]");
}
