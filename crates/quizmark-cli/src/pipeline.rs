//! The validation run: discover, parse concurrently, aggregate, validate.
//!
//! Documents are read and parsed by a collector task with at most
//! `loader.concurrency` in flight. Each document's own parse errors go to
//! the shared [`IssueSink`] as soon as it is parsed. Once every document
//! is in, the cross-document checks run over the path-sorted set.
//!
//! Ctrl-C stops the collector. The run then returns whatever the sink holds
//! and is marked as interrupted.

use std::path::Path;
use std::pin::pin;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use quizmark_content::{find_documents, load_documents, Loaded};
use quizmark_core::{sort_issues, Config, Document, ValidationIssue};
use quizmark_validate::{Check, ParseDiagnosticsCheck, Validator};

/// Append-only issue collector shared between tasks.
#[derive(Debug, Clone, Default)]
pub struct IssueSink {
    inner: Arc<Mutex<Vec<ValidationIssue>>>,
}

impl IssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, issue: ValidationIssue) {
        self.lock().push(issue);
    }

    pub fn extend(&self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.lock().extend(issues);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take everything collected so far.
    pub fn drain(&self) -> Vec<ValidationIssue> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ValidationIssue>> {
        // Pushes never leave the Vec in a partial state, so poisoning is ignored.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    /// Parsed documents sorted by path. Empty when interrupted.
    pub documents: Vec<Document>,
    /// All issues, sorted by path then message.
    pub issues: Vec<ValidationIssue>,
    /// Number of documents discovered under the root.
    pub discovered: usize,
    /// Whether the run was cut short by Ctrl-C.
    pub interrupted: bool,
}

/// Run discovery, parsing and validation over `root`.
///
/// # Errors
///
/// Fails only for run-level problems: a missing root, a bad exclude
/// pattern, or a collector task that panicked. Per-document problems are
/// returned as issues.
pub async fn run(root: &Path, config: &Config) -> Result<RunOutput> {
    let discovery = find_documents(root, &config.loader).await?;
    let discovered = discovery.files.len();
    log::info!("Validating {discovered} document(s) under {}", root.display());

    let sink = IssueSink::new();
    sink.extend(discovery.failures);

    let stream = load_documents(root, discovery.files, config.loader.concurrency);
    let mut collector = tokio::spawn(collect(stream, sink.clone()));
    let mut ctrl_c = pin!(tokio::signal::ctrl_c());

    tokio::select! {
        joined = &mut collector => {
            let mut documents = joined.context("document collector task failed")?;
            documents.sort_by(|a, b| a.path.cmp(&b.path));

            let mut issues = sink.drain();
            issues.extend(Validator::cross_document(&config.validate).validate(&documents));
            sort_issues(&mut issues);

            log::info!(
                "Checked {} document(s), {} issue(s)",
                documents.len(),
                issues.len()
            );
            Ok(RunOutput {
                documents,
                issues,
                discovered,
                interrupted: false,
            })
        }
        Ok(()) = &mut ctrl_c => {
            collector.abort();
            let mut issues = sink.drain();
            sort_issues(&mut issues);
            log::warn!("Interrupted; reporting {} issue(s) collected so far", issues.len());
            Ok(RunOutput {
                documents: Vec::new(),
                issues,
                discovered,
                interrupted: true,
            })
        }
    }
}

/// Drain the load stream, recording per-document issues as they arrive.
async fn collect(stream: impl Stream<Item = Loaded>, sink: IssueSink) -> Vec<Document> {
    let mut stream = pin!(stream);
    let mut documents = Vec::new();

    while let Some(loaded) = stream.next().await {
        match loaded {
            Loaded::Document(doc) => {
                sink.extend(ParseDiagnosticsCheck.check(&[&*doc]));
                log::debug!("Parsed {}", doc.path.display());
                documents.push(*doc);
            }
            Loaded::Failed(issue) => sink.push(issue),
        }
    }
    documents
}
