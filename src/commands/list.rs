//! List command
//!
//! Implements `fnnote list`: show every recognized function header and
//! whether it already carries a comment. Nothing is written.

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;
use serde::Serialize;
use tracing::warn;

use super::apply_scan_overrides;
use crate::annotate::{find_headers, HeaderSite};
use crate::config::Config;
use crate::scan::{find_candidates, ScanOptions};
use crate::source::read_lines;

/// Options for the list command
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// File or directory to inspect
    pub path: PathBuf,
    /// Only show headers without a comment
    pub missing_only: bool,
    /// Output as JSON
    pub json: bool,
    /// Replace the configured extensions
    pub extensions: Vec<String>,
    /// Extra directory names to prune
    pub ignore: Vec<String>,
    /// Descend into hidden directories
    pub include_hidden: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            missing_only: false,
            json: false,
            extensions: Vec::new(),
            ignore: Vec::new(),
            include_hidden: false,
        }
    }
}

impl ListOptions {
    /// Scan settings from the config with CLI overrides applied
    pub fn scan_options(&self, mut config: Config) -> ScanOptions {
        apply_scan_overrides(
            &mut config,
            &self.extensions,
            &self.ignore,
            self.include_hidden,
        );
        ScanOptions::from_config(&config)
    }
}

/// Headers found in one file
#[derive(Debug, Clone, Serialize)]
pub struct FileHeaders {
    pub path: PathBuf,
    pub headers: Vec<HeaderSite>,
}

/// Collect headers for every candidate under `path`. Unreadable files are
/// logged and skipped.
pub fn collect_headers(
    path: &Path,
    scan: &ScanOptions,
    missing_only: bool,
) -> Result<Vec<FileHeaders>> {
    let mut found = Vec::new();
    for file in find_candidates(path, scan)? {
        let lines = match read_lines(&file) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(path = %file.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        let mut headers = find_headers(&lines);
        if missing_only {
            headers.retain(|h| !h.documented);
        }
        if !headers.is_empty() {
            found.push(FileHeaders { path: file, headers });
        }
    }
    Ok(found)
}

/// Execute the list command
pub fn execute_list(options: ListOptions, config: Config) -> Result<()> {
    let scan = options.scan_options(config);
    let files = collect_headers(&options.path, &scan, options.missing_only)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    let mut total = 0;
    let mut missing = 0;
    for file in &files {
        println!("{}", style(file.path.display()).bold());
        for site in &file.headers {
            let marker = if site.documented {
                style("documented").green()
            } else {
                missing += 1;
                style("missing").yellow()
            };
            println!(
                "  {:>5}  {:<22} {}({})  {}",
                site.line,
                site.header.kind.as_str(),
                site.header.name,
                site.header.parameters.trim(),
                marker
            );
            total += 1;
        }
    }
    println!("\n{} headers, {} without a note", total, missing);

    Ok(())
}
