//! Candidate locator
//!
//! Walks the target tree and collects the files to annotate. Ignored and
//! hidden directories are pruned before the walker descends into them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::{NoteError, Result};

/// What to collect and what to skip
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File extensions to keep, without the leading dot
    pub extensions: Vec<String>,
    /// Directory-name patterns to prune (glob syntax, matched on the name)
    pub ignore: Vec<String>,
    /// Descend into directories whose name starts with `.`
    pub include_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            extensions: config.extensions.clone(),
            ignore: config.ignore.clone(),
            include_hidden: config.include_hidden,
        }
    }
}

struct DirFilter {
    patterns: Vec<Pattern>,
    include_hidden: bool,
}

impl DirFilter {
    fn new(options: &ScanOptions) -> Result<Self> {
        let patterns = options
            .ignore
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| NoteError::Pattern {
                    pattern: p.clone(),
                    message: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            include_hidden: options.include_hidden,
        })
    }

    /// Whether the walker may enter this entry
    fn allows(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if !self.include_hidden && name.starts_with('.') {
            trace!(dir = %entry.path().display(), "pruning hidden directory");
            return false;
        }
        if self.patterns.iter().any(|p| p.matches(&name)) {
            trace!(dir = %entry.path().display(), "pruning ignored directory");
            return false;
        }
        true
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|want| want.trim_start_matches('.') == ext))
        .unwrap_or(false)
}

/// Collect candidate files under `root`, sorted and de-duplicated.
///
/// A `root` that is itself a file is returned as the only candidate.
pub fn find_candidates(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(NoteError::RootNotFound(root.to_path_buf()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let filter = DirFilter::new(options)?;
    let mut files = BTreeSet::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| filter.allows(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), &options.extensions) {
            files.insert(entry.into_path());
        }
    }

    debug!(count = files.len(), root = %root.display(), "collected candidates");
    Ok(files.into_iter().collect())
}
