//! Batch annotator
//!
//! Applies the rewriter to every candidate file. Files are independent, so
//! they are fanned out over a rayon pool; outcomes come back in candidate
//! order and are folded into a [`RunSummary`] afterwards.

pub mod summary;

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::annotate::{rewrite_lines, NoteTemplate};
use crate::error::Result;
use crate::scan::{find_candidates, ScanOptions};
use crate::source::{read_lines, write_lines};

pub use summary::{FileFailure, FileOutcome, FileStatus, Preview, RunSummary};

/// Whether computed rewrites are written back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Apply,
    DryRun,
}

/// Persists a rewritten file
pub type WriteBack = fn(&Path, &[String]) -> Result<()>;

/// Annotates files one by one or in parallel
#[derive(Clone)]
pub struct Annotator {
    template: NoteTemplate,
    mode: WriteMode,
    workers: Option<usize>,
    keep_preview: bool,
    progress: Option<ProgressBar>,
    write_back: WriteBack,
}

impl Annotator {
    pub fn new(template: NoteTemplate) -> Self {
        Self {
            template,
            mode: WriteMode::Apply,
            workers: None,
            keep_preview: false,
            progress: None,
            write_back: write_lines::<String>,
        }
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Worker count; `Some(1)` runs sequentially on the calling thread
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Keep before/after content on changed outcomes (for diffs)
    pub fn with_preview(mut self, keep: bool) -> Self {
        self.keep_preview = keep;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Replace the atomic file write used in `Apply` mode
    pub fn with_write_back(mut self, write_back: WriteBack) -> Self {
        self.write_back = write_back;
        self
    }

    /// Rewrite a single file. Never fails: errors are recorded in the outcome.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let lines = match read_lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                return FileOutcome::new(
                    path.to_path_buf(),
                    FileStatus::ReadFailed {
                        error: e.to_string(),
                    },
                );
            }
        };

        let rewrite = rewrite_lines(&lines, &self.template);
        if !rewrite.is_changed() {
            debug!(path = %path.display(), "already documented");
            return FileOutcome::new(path.to_path_buf(), FileStatus::Unchanged);
        }

        let added = rewrite.added;
        let status = match self.mode {
            WriteMode::DryRun => FileStatus::Pending { added },
            WriteMode::Apply => match (self.write_back)(path, &rewrite.lines) {
                Ok(()) => FileStatus::Annotated { added },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "write-back failed");
                    FileStatus::WriteFailed {
                        added,
                        error: e.to_string(),
                    }
                }
            },
        };
        debug!(path = %path.display(), added, "processed");

        let preview = self.keep_preview.then(|| Preview {
            before: lines.concat(),
            after: rewrite.content(),
        });

        FileOutcome {
            path: path.to_path_buf(),
            status,
            by_kind: rewrite.by_kind,
            preview,
        }
    }

    fn process_tracked(&self, path: &Path) -> FileOutcome {
        let outcome = self.process_file(path);
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
        outcome
    }

    /// Process every file, returning outcomes in input order
    pub fn process_all(&self, files: &[PathBuf]) -> Vec<FileOutcome> {
        match self.workers {
            Some(1) => files.iter().map(|f| self.process_tracked(f)).collect(),
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => {
                    pool.install(|| files.par_iter().map(|f| self.process_tracked(f)).collect())
                }
                Err(e) => {
                    warn!(error = %e, "could not build worker pool, running sequentially");
                    files.iter().map(|f| self.process_tracked(f)).collect()
                }
            },
            None => files.par_iter().map(|f| self.process_tracked(f)).collect(),
        }
    }

    /// Locate candidates under `root` and annotate them
    pub fn run(&self, root: &Path, scan: &ScanOptions) -> Result<(Vec<FileOutcome>, RunSummary)> {
        let files = find_candidates(root, scan)?;
        if let Some(progress) = &self.progress {
            progress.set_length(files.len() as u64);
        }

        let outcomes = self.process_all(&files);
        let summary = RunSummary::from_outcomes(&outcomes, self.mode == WriteMode::Apply);
        info!(
            files = summary.files_processed,
            added = summary.annotations_added,
            "run complete"
        );
        Ok((outcomes, summary))
    }
}
