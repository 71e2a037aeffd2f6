//! Common test utilities for quizmark integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A temporary document tree.
pub struct Corpus {
    dir: TempDir,
}

impl Corpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Writes a well-formed chapter with one valid question.
    pub fn chapter(&self, rel: &str, title: &str, weight: u64) -> PathBuf {
        self.write(rel, &chapter(title, weight, QUESTION_OK))
    }

    /// Runs `quizmark <args...>` with the corpus root appended where `{root}`
    /// appears.
    pub fn run(&self, args: &[&str]) -> Output {
        let root = self.root().to_string_lossy().into_owned();
        let args: Vec<String> = args.iter().map(|a| a.replace("{root}", &root)).collect();
        quizmark(&args)
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}

pub const QUESTION_OK: &str = "\
### Which function adds an element to a vector?

- [ ] `assoc-in`
- [x] `conj`
- [ ] `disj`

> **Explanation:** `conj` adds to the end of a vector.
";

pub const QUESTION_NO_EXPLANATION: &str = "\
### What does `(first [])` return?

- [x] `nil`
- [ ] an exception
";

pub const QUESTION_TWO_CORRECT: &str = "\
### Which are persistent collections?

- [x] vectors
- [x] maps
- [ ] arrays

> **Explanation:** Both vectors and maps are persistent.
";

/// A chapter with front matter and one quiz block holding `questions`.
pub fn chapter(title: &str, weight: u64, questions: &str) -> String {
    format!(
        "---\ntitle: \"{title}\"\nweight: {weight}\ntags: [clojure]\n---\n\n# {title}\n\nSome prose.\n\n{{{{< quizdown >}}}}\n\n{questions}\n{{{{< /quizdown >}}}}\n"
    )
}

/// Runs the quizmark binary with `RUST_LOG` and config variables cleared.
pub fn quizmark<S: AsRef<std::ffi::OsStr>>(args: &[S]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quizmark"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("QUIZMARK_CONFIG")
        .output()
        .expect("failed to run quizmark")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}
