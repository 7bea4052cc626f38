//! CLI command implementations
//!
//! Each command lives in its own submodule with an `XxxOptions` struct and an
//! `execute_xxx` entry point.

pub mod annotate;
pub mod init;
pub mod list;

pub use annotate::{execute_annotate, exit_code, AnnotateOptions, OutputFormat};
pub use init::{execute_init, InitOptions};
pub use list::{collect_headers, execute_list, FileHeaders, ListOptions};

use crate::config::Config;

/// Apply `--ext`, `--ignore` and `--include-hidden` to a loaded config.
/// Extensions replace the configured set; ignore entries extend it.
pub(crate) fn apply_scan_overrides(
    config: &mut Config,
    extensions: &[String],
    ignore: &[String],
    include_hidden: bool,
) {
    if !extensions.is_empty() {
        config.extensions = extensions.to_vec();
    }
    config.ignore.extend(ignore.iter().cloned());
    config.include_hidden |= include_hidden;
}
