//! Single-pass rewriter
//!
//! Walks a file's lines once, classifying each. A header that is not already
//! preceded by a comment gets an annotation block inserted right above it.
//! Original lines are copied through untouched, terminators included.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::note::{AnnotationBlock, NoteTemplate};
use crate::classify::{classify, HeaderKind, HeaderMatch};

/// Blank lines the idempotency scan may step over before giving up
pub const MAX_BLANK_LOOKBACK: usize = 5;

/// Prefixes (after leading whitespace) that mark a line as a comment.
/// `*` covers both block continuation lines and the closing `*/`.
const COMMENT_MARKERS: [&str; 3] = ["/*", "*", "//"];

/// Result of rewriting one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    /// Rewritten content, one entry per line with its terminator
    pub lines: Vec<String>,
    /// Number of annotation blocks inserted
    pub added: usize,
    /// Inserted blocks broken down by the recognizer that found the header
    pub by_kind: BTreeMap<HeaderKind, usize>,
}

impl Rewrite {
    pub fn is_changed(&self) -> bool {
        self.added > 0
    }

    pub fn content(&self) -> String {
        self.lines.concat()
    }
}

/// A header found in a file, with its documentation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSite {
    /// 1-based line number in the input
    pub line: usize,
    #[serde(flatten)]
    pub header: HeaderMatch,
    pub documented: bool,
}

/// Whether the lines written so far end in a comment, looking past at most
/// [`MAX_BLANK_LOOKBACK`] blank lines.
pub fn is_documented<S: AsRef<str>>(preceding: &[S]) -> bool {
    let mut blanks = 0;
    for line in preceding.iter().rev() {
        let text = line.as_ref();
        if text.trim().is_empty() {
            blanks += 1;
            if blanks > MAX_BLANK_LOOKBACK {
                return false;
            }
            continue;
        }
        let stripped = text.trim_start();
        return COMMENT_MARKERS.iter().any(|m| stripped.starts_with(m));
    }
    false
}

/// Terminator to give inserted lines: the header's own. An unterminated
/// last line borrows the terminator of the line before it, then `\n`.
fn terminator_of(line: &str, previous: Option<&str>) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else if previous.is_some_and(|p| p.ends_with("\r\n")) {
        "\r\n"
    } else {
        "\n"
    }
}

/// Rewrite a file's lines, inserting blocks above undocumented headers
pub fn rewrite_lines<S: AsRef<str>>(lines: &[S], template: &NoteTemplate) -> Rewrite {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut added = 0;
    let mut by_kind = BTreeMap::new();

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if let Some(header) = classify(line) {
            if !is_documented(&out) {
                debug!(
                    line = idx + 1,
                    name = %header.name,
                    kind = %header.kind,
                    "inserting note"
                );
                let block = AnnotationBlock::for_header(&header);
                let terminator = terminator_of(line, out.last().map(String::as_str));
                out.extend(block.render(template, terminator));
                added += 1;
                *by_kind.entry(header.kind).or_insert(0) += 1;
            }
        }
        out.push(line.to_string());
    }

    Rewrite {
        lines: out,
        added,
        by_kind,
    }
}

/// List every header in a file without changing anything
pub fn find_headers<S: AsRef<str>>(lines: &[S]) -> Vec<HeaderSite> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            classify(line.as_ref()).map(|header| HeaderSite {
                line: idx + 1,
                header,
                documented: is_documented(&lines[..idx]),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        text.split_inclusive('\n').map(String::from).collect()
    }

    fn rewrite(text: &str) -> Rewrite {
        rewrite_lines(&lines(text), &NoteTemplate::default())
    }

    #[test]
    fn test_greet_scenario() {
        let input = "function greet(name) {\n  return name;\n}\n";
        let first = rewrite(input);
        assert_eq!(first.added, 1);
        assert_eq!(first.lines.len(), 8);
        assert_eq!(first.lines[0], "/**\n");
        assert_eq!(first.lines[2], " * Inputs: name\n");
        assert_eq!(first.lines[4], " */\n");
        assert_eq!(&first.lines[5..], &lines(input)[..]);

        let second = rewrite(&first.content());
        assert_eq!(second.added, 0);
        assert_eq!(second.content(), first.content());
    }

    #[test]
    fn test_documented_by_line_comment() {
        let input = "// adds things\nfunction add(a, b) {\n}\n";
        let result = rewrite(input);
        assert_eq!(result.added, 0);
        assert_eq!(result.content(), input);
    }

    #[test]
    fn test_blank_line_allowance() {
        let five = format!("// doc\n{}function f() {{\n}}\n", "\n".repeat(5));
        assert_eq!(rewrite(&five).added, 0);

        let six = format!("// doc\n{}function f() {{\n}}\n", "  \n".repeat(6));
        assert_eq!(rewrite(&six).added, 1);
    }

    #[test]
    fn test_code_above_means_undocumented() {
        let input = "let x = 1;\n\nfunction f() {\n}\n";
        let result = rewrite(input);
        assert_eq!(result.added, 1);
        assert_eq!(result.lines[2], "/**\n");
        assert_eq!(result.lines[7], "function f() {\n");
    }

    #[test]
    fn test_is_documented_markers() {
        assert!(is_documented(&["/** doc */"]));
        assert!(is_documented(&["  /* doc */", ""]));
        assert!(is_documented(&["   * continuation"]));
        assert!(is_documented(&["   */"]));
        assert!(is_documented(&["// line"]));
        assert!(!is_documented(&["}"]));
        assert!(!is_documented::<&str>(&[]));
        assert!(!is_documented(&["", "", ""]));
    }

    #[test]
    fn test_indentation_fidelity() {
        let input = "class A {\n    const f = (x) => {\n    }\n}\n";
        let result = rewrite(input);
        assert_eq!(result.added, 1);
        for inserted in &result.lines[1..6] {
            assert!(inserted.starts_with("    "), "{:?}", inserted);
            assert!(!inserted.starts_with("     /"), "{:?}", inserted);
        }
    }

    #[test]
    fn test_control_flow_passes_through() {
        let input = "if (x > 0) {\n}\nfor (let i = 0; i < n; i++) {\n}\n";
        let result = rewrite(input);
        assert_eq!(result.added, 0);
        assert_eq!(result.content(), input);
    }

    #[test]
    fn test_crlf_and_unterminated_last_line() {
        let crlf = rewrite("function a() {\r\n}\r\n");
        assert!(crlf.lines[..5].iter().all(|l| l.ends_with("\r\n")));

        let bare = rewrite("const f = x => {");
        assert_eq!(bare.added, 1);
        assert_eq!(bare.lines[0], "/**\n");
        assert_eq!(bare.lines[5], "const f = x => {");
    }

    #[test]
    fn test_unterminated_header_in_crlf_file_stays_crlf() {
        let result = rewrite("a();\r\nfunction f() {");
        assert_eq!(result.added, 1);
        assert_eq!(result.lines.len(), 7);
        assert!(result.lines[..6].iter().all(|l| l.ends_with("\r\n")));
        assert_eq!(result.lines[6], "function f() {");

        let lf = rewrite("a();\nfunction f() {");
        assert!(lf.lines[..6].iter().all(|l| l.ends_with('\n') && !l.ends_with("\r\n")));
    }

    #[test]
    fn test_original_lines_preserved_in_order() {
        let input = "function a() {\n}\nobj.b = function(x) {\n}\n  c(y) {\n  }\n";
        let original = lines(input);
        let result = rewrite(input);
        assert_eq!(result.added, 3);

        let mut remaining = original.iter();
        let mut next = remaining.next();
        for line in &result.lines {
            if Some(line) == next {
                next = remaining.next();
            }
        }
        assert_eq!(next, None);
    }

    #[test]
    fn test_breakdown_by_kind() {
        let input = "function a() {\n}\nfunction b() {\n}\nconst c = () => {\n}\n";
        let result = rewrite(input);
        assert_eq!(result.by_kind.get(&HeaderKind::Declaration), Some(&2));
        assert_eq!(result.by_kind.get(&HeaderKind::Arrow), Some(&1));
    }

    #[test]
    fn test_find_headers_reports_status() {
        let input = "// doc\nfunction a() {\n}\nfunction b(x) {\n}\n";
        let sites = find_headers(&lines(input));
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].line, 2);
        assert!(sites[0].documented);
        assert_eq!(sites[1].line, 4);
        assert_eq!(sites[1].header.name, "b");
        assert!(!sites[1].documented);
    }
}
