//! Annotation decision and rewriting
//!
//! - [`note`] renders the comment block inserted above a header
//! - [`rewriter`] runs the classify/decide/emit pass over one file

pub mod note;
pub mod rewriter;

pub use note::{AnnotationBlock, NoteLocale, NoteTemplate};
pub use rewriter::{
    find_headers, is_documented, rewrite_lines, HeaderSite, Rewrite, MAX_BLANK_LOOKBACK,
};
