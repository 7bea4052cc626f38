#![forbid(unsafe_code)]

//! # fnnote
//!
//! Inserts placeholder doc blocks above undocumented JavaScript functions.
//!
//! ## How it works
//!
//! - **Locate**: walk the tree, pruning ignored and hidden directories
//! - **Classify**: match each line against an ordered set of header shapes
//! - **Rewrite**: insert a comment block above every header that has none,
//!   keeping all other bytes intact; running again adds nothing
//!
//! ## Example
//!
//! ```rust,no_run
//! use fnnote::{Annotator, Config, ScanOptions};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let annotator = Annotator::new(config.note_template());
//!
//!     let (_, summary) = annotator.run("src".as_ref(), &ScanOptions::from_config(&config))?;
//!     println!("{} notes added", summary.annotations_added);
//!
//!     Ok(())
//! }
//! ```

pub mod annotate;
pub mod batch;
pub mod classify;
pub mod commands;
pub mod config;
pub mod error;
pub mod scan;
pub mod source;

// Re-exports
pub use annotate::{
    find_headers, is_documented, rewrite_lines, AnnotationBlock, HeaderSite, NoteLocale,
    NoteTemplate, Rewrite,
};
pub use batch::{Annotator, FileOutcome, FileStatus, RunSummary, WriteBack, WriteMode};
pub use classify::{classify, HeaderKind, HeaderMatch};
pub use config::Config;
pub use error::{NoteError, Result};
pub use scan::{find_candidates, ScanOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
