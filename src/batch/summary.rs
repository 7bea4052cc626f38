//! Per-file outcomes and the run summary reduced from them

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::classify::HeaderKind;

/// What happened to one candidate file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileStatus {
    /// Every header was already documented (or there were none)
    Unchanged,
    /// Notes inserted and written back
    Annotated { added: usize },
    /// Notes computed but not written (dry run, check or diff preview)
    Pending { added: usize },
    /// File could not be read; skipped
    ReadFailed { error: String },
    /// Notes computed but the write-back failed
    WriteFailed { added: usize, error: String },
}

impl FileStatus {
    /// Notes inserted, or that would have been
    pub fn added(&self) -> usize {
        match self {
            FileStatus::Annotated { added }
            | FileStatus::Pending { added }
            | FileStatus::WriteFailed { added, .. } => *added,
            FileStatus::Unchanged | FileStatus::ReadFailed { .. } => 0,
        }
    }
}

/// Content before and after a rewrite, kept for diff output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub before: String,
    pub after: String,
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_kind: BTreeMap<HeaderKind, usize>,
    #[serde(skip)]
    pub preview: Option<Preview>,
}

impl FileOutcome {
    pub fn new(path: PathBuf, status: FileStatus) -> Self {
        Self {
            path,
            status,
            by_kind: BTreeMap::new(),
            preview: None,
        }
    }

    pub fn added(&self) -> usize {
        self.status.added()
    }
}

/// A file that failed to read or write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Candidate files attempted, including those that failed
    pub files_processed: usize,
    /// Files that received (or would receive) at least one note
    pub files_changed: usize,
    /// Notes inserted, or that would be inserted
    pub annotations_added: usize,
    /// Whether anything was actually written
    pub applied: bool,
    pub by_kind: BTreeMap<HeaderKind, usize>,
    pub read_failures: Vec<FileFailure>,
    pub write_failures: Vec<FileFailure>,
}

impl RunSummary {
    /// Fold per-file outcomes into totals
    pub fn from_outcomes(outcomes: &[FileOutcome], applied: bool) -> Self {
        let mut summary = RunSummary {
            applied,
            ..RunSummary::default()
        };
        for outcome in outcomes {
            summary.absorb(outcome);
        }
        summary
    }

    fn absorb(&mut self, outcome: &FileOutcome) {
        self.files_processed += 1;
        let added = outcome.added();
        if added > 0 {
            self.files_changed += 1;
            self.annotations_added += added;
            for (kind, count) in &outcome.by_kind {
                *self.by_kind.entry(*kind).or_insert(0) += count;
            }
        }
        match &outcome.status {
            FileStatus::ReadFailed { error } => self.read_failures.push(FileFailure {
                path: outcome.path.clone(),
                error: error.clone(),
            }),
            FileStatus::WriteFailed { error, .. } => self.write_failures.push(FileFailure {
                path: outcome.path.clone(),
                error: error.clone(),
            }),
            _ => {}
        }
    }

    pub fn has_write_failures(&self) -> bool {
        !self.write_failures.is_empty()
    }
}
