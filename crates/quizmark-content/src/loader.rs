//! Corpus discovery and document loading.
//!
//! Discovery walks the root directory once and returns a sorted list of
//! document paths relative to the root. Loading reads each file, parses it
//! on the blocking pool, and yields results as they complete. A file that
//! cannot be read becomes an `io-error` issue; it never aborts the run.

use std::path::{Path, PathBuf};

use async_walkdir::WalkDir;
use futures::stream::{self, Stream, StreamExt};
use quizmark_core::util::paths::{display_path, relative_to};
use quizmark_core::{Document, Error, IssueKind, LoaderConfig, Result, ValidationIssue};

use crate::document::parse_document;

/// Documents found under a root.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Paths relative to the root, sorted.
    pub files: Vec<PathBuf>,
    /// Entries the walk could not read.
    pub failures: Vec<ValidationIssue>,
}

/// Outcome of loading a single document.
#[derive(Debug, Clone)]
pub enum Loaded {
    Document(Box<Document>),
    Failed(ValidationIssue),
}

/// Find every document under `root`.
///
/// Files are selected by extension and filtered by the configured exclude
/// globs, which match against the forward-slash path relative to `root`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `root` is not an existing directory, and
/// [`Error::Config`] if an exclude pattern does not compile.
pub async fn find_documents(root: &Path, loader: &LoaderConfig) -> Result<Discovery> {
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => {}
        _ => {
            return Err(Error::not_found(
                root.display().to_string(),
                "Document root directory",
            ));
        }
    }

    let exclude = loader.exclude_patterns()?;
    let mut discovery = Discovery::default();
    let mut walker = WalkDir::new(root);

    while let Some(entry) = walker.next().await {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Walk error: {}", e);
                discovery.failures.push(ValidationIssue::error(
                    IssueKind::IoError,
                    ".",
                    format!("could not read directory entry: {e}"),
                ));
                continue;
            }
        };

        let path = entry.path();

        // Skip directories
        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => continue,
            Ok(_) => {}
            Err(e) => {
                log::warn!("Cannot stat {}: {}", path.display(), e);
                discovery.failures.push(ValidationIssue::error(
                    IssueKind::IoError,
                    relative_to(&path, root),
                    format!("could not read directory entry: {e}"),
                ));
                continue;
            }
        }
        if !loader.matches_extension(&path) {
            continue;
        }

        let rel = relative_to(&path, root);
        let rel_str = display_path(&rel);
        if exclude.iter().any(|p| p.matches(&rel_str)) {
            log::debug!("Excluded {rel_str}");
            continue;
        }
        discovery.files.push(rel);
    }

    // Sort for deterministic ordering
    discovery.files.sort();

    log::debug!(
        "Discovered {} document(s) under {}",
        discovery.files.len(),
        root.display()
    );
    Ok(discovery)
}

/// Read and parse one document.
pub async fn load_document(root: PathBuf, rel_path: PathBuf) -> Loaded {
    let full = root.join(&rel_path);
    let text = match tokio::fs::read_to_string(&full).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Failed to read {}: {}", full.display(), e);
            return Loaded::Failed(ValidationIssue::error(
                IssueKind::IoError,
                &rel_path,
                format!("could not read file: {e}"),
            ));
        }
    };

    let path = rel_path.clone();
    match tokio::task::spawn_blocking(move || parse_document(path, &text)).await {
        Ok(doc) => Loaded::Document(Box::new(doc)),
        Err(e) => {
            log::error!("Parser task for {} failed: {}", rel_path.display(), e);
            Loaded::Failed(ValidationIssue::error(
                IssueKind::IoError,
                &rel_path,
                format!("could not parse file: {e}"),
            ))
        }
    }
}

/// Load `files` with at most `concurrency` documents in flight.
///
/// Results arrive in completion order, not input order.
pub fn load_documents(
    root: &Path,
    files: Vec<PathBuf>,
    concurrency: usize,
) -> impl Stream<Item = Loaded> + Send + use<> {
    let root = root.to_path_buf();
    stream::iter(files)
        .map(move |rel| load_document(root.clone(), rel))
        .buffer_unordered(concurrency.max(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "part-2/loops.md", "---\ntitle: Loops\nweight: 20\n---\n");
        write(dir.path(), "part-1/intro.md", "---\ntitle: Intro\nweight: 10\n---\n");
        write(dir.path(), "part-1/notes.txt", "not a document");
        write(dir.path(), "drafts/wip.md", "# WIP");
        dir
    }

    // ------------------------------------------------------------------------
    // find_documents tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_find_documents_sorted_and_relative() {
        let dir = corpus();
        let found = find_documents(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();
        assert_eq!(
            found.files,
            vec![
                PathBuf::from("drafts/wip.md"),
                PathBuf::from("part-1/intro.md"),
                PathBuf::from("part-2/loops.md"),
            ]
        );
        assert!(found.failures.is_empty());
    }

    #[tokio::test]
    async fn test_find_documents_excludes() {
        let dir = corpus();
        let loader = LoaderConfig {
            exclude: vec!["drafts/**".to_string()],
            ..LoaderConfig::default()
        };
        let found = find_documents(dir.path(), &loader).await.unwrap();
        assert_eq!(found.files.len(), 2);
        assert!(found.files.iter().all(|p| !p.starts_with("drafts")));
    }

    #[tokio::test]
    async fn test_find_documents_skips_directories_with_document_extension() {
        let dir = corpus();
        write(dir.path(), "assets.md/inner.md", "---\ntitle: Inner\nweight: 30\n---\n");
        let found = find_documents(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();
        assert!(found.files.contains(&PathBuf::from("assets.md/inner.md")));
        assert!(!found.files.contains(&PathBuf::from("assets.md")));
        assert_eq!(found.files.len(), 4);
        assert!(found.failures.is_empty());
    }

    #[tokio::test]
    async fn test_find_documents_empty_dir() {
        let dir = TempDir::new().unwrap();
        let found = find_documents(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();
        assert!(found.files.is_empty());
    }

    #[tokio::test]
    async fn test_find_documents_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = find_documents(&dir.path().join("missing"), &LoaderConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    // ------------------------------------------------------------------------
    // load tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_load_document() {
        let dir = corpus();
        match load_document(dir.path().to_path_buf(), PathBuf::from("part-1/intro.md")).await {
            Loaded::Document(doc) => {
                assert_eq!(doc.path, PathBuf::from("part-1/intro.md"));
                assert_eq!(doc.nav_weight(), Some(10));
            }
            Loaded::Failed(issue) => panic!("unexpected failure: {issue:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_unreadable_document() {
        let dir = corpus();
        match load_document(dir.path().to_path_buf(), PathBuf::from("gone.md")).await {
            Loaded::Failed(issue) => {
                assert_eq!(issue.kind, IssueKind::IoError);
                assert_eq!(issue.document_path, PathBuf::from("gone.md"));
                assert!(issue.is_error());
            }
            Loaded::Document(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_load_non_utf8_is_io_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bin.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let loaded = load_document(dir.path().to_path_buf(), PathBuf::from("bin.md")).await;
        assert!(matches!(loaded, Loaded::Failed(ref i) if i.kind == IssueKind::IoError));
    }

    #[tokio::test]
    async fn test_load_documents_stream() {
        let dir = corpus();
        let found = find_documents(dir.path(), &LoaderConfig::default())
            .await
            .unwrap();
        let mut paths: Vec<PathBuf> = load_documents(dir.path(), found.files, 2)
            .filter_map(|loaded| async move {
                match loaded {
                    Loaded::Document(doc) => Some(doc.path),
                    Loaded::Failed(_) => None,
                }
            })
            .collect()
            .await;
        paths.sort();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], PathBuf::from("drafts/wip.md"));
    }
}
