//! Annotate command
//!
//! Implements `fnnote annotate`: locate candidate files, insert notes above
//! undocumented function headers and report what changed.

use std::path::PathBuf;

use anyhow::Result;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use similar::TextDiff;

use super::apply_scan_overrides;
use crate::annotate::NoteLocale;
use crate::batch::{Annotator, FileOutcome, FileStatus, RunSummary, WriteMode};
use crate::config::Config;
use crate::scan::ScanOptions;

/// Output format for annotation results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Per-file lines plus a summary
    #[default]
    Text,
    /// Machine-readable summary
    Json,
    /// Unified diff preview (never writes)
    Diff,
}

/// Options for the annotate command
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// File or directory to annotate
    pub path: PathBuf,
    /// Compute changes without writing
    pub dry_run: bool,
    /// CI mode - report pending notes without writing
    pub check: bool,
    /// Output format
    pub format: OutputFormat,
    /// Replace the configured extensions
    pub extensions: Vec<String>,
    /// Extra directory names to prune
    pub ignore: Vec<String>,
    /// Descend into hidden directories
    pub include_hidden: bool,
    /// Override the configured note locale
    pub locale: Option<NoteLocale>,
    /// Override the empty-parameter placeholder
    pub placeholder: Option<String>,
    /// Number of parallel workers
    pub workers: Option<usize>,
    /// Verbose output
    pub verbose: bool,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            dry_run: false,
            check: false,
            format: OutputFormat::Text,
            extensions: Vec::new(),
            ignore: Vec::new(),
            include_hidden: false,
            locale: None,
            placeholder: None,
            workers: None,
            verbose: false,
        }
    }
}

impl AnnotateOptions {
    /// Layer CLI overrides on top of the loaded config
    pub fn merge_into(&self, mut config: Config) -> Config {
        apply_scan_overrides(
            &mut config,
            &self.extensions,
            &self.ignore,
            self.include_hidden,
        );
        if let Some(locale) = self.locale {
            config.note.locale = locale;
        }
        if let Some(placeholder) = &self.placeholder {
            config.note.empty_placeholder = Some(placeholder.clone());
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        config
    }

    fn write_mode(&self) -> WriteMode {
        if self.dry_run || self.check || self.format == OutputFormat::Diff {
            WriteMode::DryRun
        } else {
            WriteMode::Apply
        }
    }
}

fn progress_bar() -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} files")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(0).with_style(style)
}

/// Execute the annotate command
pub fn execute_annotate(options: AnnotateOptions, config: Config) -> Result<RunSummary> {
    let config = options.merge_into(config);
    let scan = ScanOptions::from_config(&config);
    let mode = options.write_mode();

    let mut annotator = Annotator::new(config.note_template())
        .with_mode(mode)
        .with_workers(config.workers)
        .with_preview(options.format == OutputFormat::Diff);

    let progress = (options.format == OutputFormat::Text && Term::stderr().is_term())
        .then(progress_bar);
    if let Some(pb) = &progress {
        annotator = annotator.with_progress(pb.clone());
    }

    if options.verbose {
        eprintln!(
            "{} Annotating {} ({})",
            style("→").cyan(),
            options.path.display(),
            config.extensions.join(", ")
        );
    }

    let (outcomes, summary) = annotator.run(&options.path, &scan)?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match options.format {
        OutputFormat::Text => print_text(&outcomes, &summary, &options),
        OutputFormat::Json => {
            let files: Vec<&FileOutcome> = outcomes
                .iter()
                .filter(|o| o.status != FileStatus::Unchanged)
                .collect();
            let output = serde_json::json!({
                "summary": summary,
                "files": files,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Diff => {
            for outcome in &outcomes {
                if let Some(preview) = &outcome.preview {
                    let name = outcome.path.display().to_string();
                    let diff = TextDiff::from_lines(&preview.before, &preview.after)
                        .unified_diff()
                        .context_radius(3)
                        .header(&name, &name)
                        .to_string();
                    print!("{}", diff);
                }
            }
        }
    }

    Ok(summary)
}

/// Process exit status after a run: 1 when a write-back failed, or when
/// `--check` found headers without a note.
pub fn exit_code(summary: &RunSummary, check: bool) -> i32 {
    if summary.has_write_failures() || (check && summary.annotations_added > 0) {
        1
    } else {
        0
    }
}

fn print_text(outcomes: &[FileOutcome], summary: &RunSummary, options: &AnnotateOptions) {
    for outcome in outcomes {
        let path = outcome.path.display();
        match &outcome.status {
            FileStatus::Annotated { added } => {
                println!("{} {} {}", style("✓").green(), style(format!("+{}", added)).bold(), path)
            }
            FileStatus::Pending { added } => {
                println!("{} {} {}", style("~").yellow(), style(format!("+{}", added)).bold(), path)
            }
            FileStatus::ReadFailed { error } => {
                eprintln!("{} Skipped {}: {}", style("⚠").yellow(), path, error)
            }
            FileStatus::WriteFailed { error, .. } => {
                eprintln!("{} Failed to write {}: {}", style("✗").red(), path, error)
            }
            FileStatus::Unchanged => {
                if options.verbose {
                    println!("  {} {}", style("·").dim(), path);
                }
            }
        }
    }

    println!("\n{}", style("Annotation Summary").bold());
    println!("==================");
    println!("Files processed:     {}", summary.files_processed);
    println!("Files changed:       {}", summary.files_changed);
    println!("Annotations added:   {}", summary.annotations_added);

    if !summary.by_kind.is_empty() {
        println!("\n{}", style("By Header Kind").bold());
        println!("--------------");
        let mut sorted: Vec<_> = summary.by_kind.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));
        for (kind, count) in sorted {
            println!("  {:<22} {}", kind.as_str(), count);
        }
    }

    if !summary.read_failures.is_empty() {
        println!(
            "\n{} {} file(s) could not be read",
            style("⚠").yellow(),
            summary.read_failures.len()
        );
    }

    if summary.has_write_failures() {
        println!(
            "\n{} {} file(s) were annotated but NOT written:",
            style("✗").red(),
            summary.write_failures.len()
        );
        for failure in &summary.write_failures {
            println!("  {} ({})", failure.path.display(), failure.error);
        }
    }

    if !summary.applied && summary.annotations_added > 0 && !options.check {
        eprintln!("\nDry run: {} to write changes", style("drop --dry-run").cyan());
    }
}
