//! Line classifier
//!
//! Recognizes the single physical line that opens a JavaScript function-like
//! construct. Recognition is line-local and regex based: a header must carry
//! its whole parameter list and the opening brace on one line. Recognizers are
//! tried in a fixed priority order and the first one that matches wins.
//!
//! Line terminators need no stripping: the trailing `\s*$` of every pattern
//! absorbs `\n` and `\r\n`.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// `function NAME(PARAMS) {`
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)function\s+([A-Za-z0-9_]+)\s*\(([^)]*)\)\s*\{\s*$").unwrap()
});

/// `async function NAME(PARAMS) {`
static ASYNC_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)async\s+function\s+([A-Za-z0-9_]+)\s*\(([^)]*)\)\s*\{\s*$").unwrap()
});

/// `export [default] function NAME(PARAMS) {`
static EXPORTED_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)export\s+(?:default\s+)?function\s+([A-Za-z0-9_]+)\s*\(([^)]*)\)\s*\{\s*$")
        .unwrap()
});

/// `const|let|var NAME = [async] (PARAMS) => {`
static ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\s*)(?:const|let|var)\s+([A-Za-z0-9_]+)\s*=\s*(?:async\s*)?\(([^)]*)\)\s*=>\s*\{\s*$",
    )
    .unwrap()
});

/// `const|let|var NAME = [async] IDENT => {`
static ARROW_SINGLE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\s*)(?:const|let|var)\s+([A-Za-z0-9_]+)\s*=\s*(?:async\s*)?([A-Za-z0-9_]+)\s*=>\s*\{\s*$",
    )
    .unwrap()
});

/// `window.app['save'] = [async] function(PARAMS) {`
static ASSIGNED_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\s*)([A-Za-z0-9_.$\[\]'"]+)\s*=\s*(?:async\s*)?function\s*\(([^)]*)\)\s*\{\s*$"#,
    )
    .unwrap()
});

/// `KEY: [async] function(PARAMS) {`
static OBJECT_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([A-Za-z0-9_]+)\s*:\s*(?:async\s*)?function\s*\(([^)]*)\)\s*\{\s*$").unwrap()
});

/// `[async] NAME(PARAMS) {`
static BARE_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(?:async\s*)?([A-Za-z_$][\w$]*)\s*\(([^)]*)\)\s*\{\s*$").unwrap()
});

/// Bare method header read without the `async` prefix. Used when the prefixed
/// reading lands on a reserved word, e.g. `asyncif(x) {` names `asyncif`.
static BARE_METHOD_UNPREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([A-Za-z_$][\w$]*)\s*\(([^)]*)\)\s*\{\s*$").unwrap()
});

/// Control-flow keywords that share the shape of a bare method header
pub const RESERVED_HEADER_NAMES: [&str; 6] = ["if", "for", "while", "switch", "catch", "with"];

/// Which recognizer produced a match, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderKind {
    /// `function f(a) {`
    Declaration,
    /// `async function f(a) {`
    AsyncDeclaration,
    /// `export default function f(a) {`
    ExportedDeclaration,
    /// `const f = (a) => {`
    Arrow,
    /// `const f = a => {`
    ArrowSingleParam,
    /// `obj.f = function(a) {`
    AssignedExpression,
    /// `f: function(a) {`
    ObjectMethod,
    /// `f(a) {`
    BareMethod,
}

impl HeaderKind {
    /// All recognizers, most specific first
    pub const ALL: [HeaderKind; 8] = [
        HeaderKind::Declaration,
        HeaderKind::AsyncDeclaration,
        HeaderKind::ExportedDeclaration,
        HeaderKind::Arrow,
        HeaderKind::ArrowSingleParam,
        HeaderKind::AssignedExpression,
        HeaderKind::ObjectMethod,
        HeaderKind::BareMethod,
    ];

    /// 1-based position in the recognizer order
    pub fn priority(self) -> u8 {
        match self {
            HeaderKind::Declaration => 1,
            HeaderKind::AsyncDeclaration => 2,
            HeaderKind::ExportedDeclaration => 3,
            HeaderKind::Arrow => 4,
            HeaderKind::ArrowSingleParam => 5,
            HeaderKind::AssignedExpression => 6,
            HeaderKind::ObjectMethod => 7,
            HeaderKind::BareMethod => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeaderKind::Declaration => "declaration",
            HeaderKind::AsyncDeclaration => "async-declaration",
            HeaderKind::ExportedDeclaration => "exported-declaration",
            HeaderKind::Arrow => "arrow",
            HeaderKind::ArrowSingleParam => "arrow-single-param",
            HeaderKind::AssignedExpression => "assigned-expression",
            HeaderKind::ObjectMethod => "object-method",
            HeaderKind::BareMethod => "bare-method",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            HeaderKind::Declaration => &*DECLARATION,
            HeaderKind::AsyncDeclaration => &*ASYNC_DECLARATION,
            HeaderKind::ExportedDeclaration => &*EXPORTED_DECLARATION,
            HeaderKind::Arrow => &*ARROW,
            HeaderKind::ArrowSingleParam => &*ARROW_SINGLE_PARAM,
            HeaderKind::AssignedExpression => &*ASSIGNED_EXPRESSION,
            HeaderKind::ObjectMethod => &*OBJECT_METHOD,
            HeaderKind::BareMethod => &*BARE_METHOD,
        }
    }

    /// Try this recognizer alone against a line
    pub fn recognize(self, line: &str) -> Option<HeaderMatch> {
        let found = self
            .pattern()
            .captures(line)
            .map(|caps| HeaderMatch::from_captures(self, &caps));

        if self != HeaderKind::BareMethod {
            return found;
        }

        match found {
            Some(m) if !m.is_reserved() => Some(m),
            Some(_) => BARE_METHOD_UNPREFIXED
                .captures(line)
                .map(|caps| HeaderMatch::from_captures(self, &caps))
                .filter(|m| !m.is_reserved()),
            None => None,
        }
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HeaderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeaderKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown header kind: {}", s))
    }
}

/// A classified header line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderMatch {
    /// Leading whitespace of the header, verbatim
    pub indentation: String,
    /// Function, method or assignment-target name
    pub name: String,
    /// Raw text between the parentheses (the bare identifier for `a => {`)
    pub parameters: String,
    pub kind: HeaderKind,
}

impl HeaderMatch {
    fn from_captures(kind: HeaderKind, caps: &Captures<'_>) -> Self {
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default().to_string();
        Self {
            indentation: group(1),
            name: group(2),
            parameters: group(3),
            kind,
        }
    }

    /// Control-flow statement caught by the bare method shape
    pub fn is_reserved(&self) -> bool {
        self.kind == HeaderKind::BareMethod && RESERVED_HEADER_NAMES.contains(&self.name.as_str())
    }
}

/// Classify one raw line. Returns `None` for anything that is not a header.
pub fn classify(line: &str) -> Option<HeaderMatch> {
    HeaderKind::ALL.into_iter().find_map(|kind| kind.recognize(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(line: &str) -> Option<HeaderKind> {
        classify(line).map(|m| m.kind)
    }

    #[test]
    fn test_plain_declaration_wins_over_bare_method() {
        let m = classify("function add(a, b) {").expect("should match");
        assert_eq!(m.kind, HeaderKind::Declaration);
        assert_eq!(m.name, "add");
        assert_eq!(m.parameters, "a, b");
        assert_eq!(m.indentation, "");
        assert_eq!(m.kind.priority(), 1);
    }

    #[test]
    fn test_async_and_exported_declarations() {
        let m = classify("  async function load(url) {").unwrap();
        assert_eq!(m.kind, HeaderKind::AsyncDeclaration);
        assert_eq!(m.indentation, "  ");
        assert_eq!(m.name, "load");

        assert_eq!(kind_of("export function run() {"), Some(HeaderKind::ExportedDeclaration));
        assert_eq!(
            kind_of("export default function main(argv) {"),
            Some(HeaderKind::ExportedDeclaration)
        );
    }

    #[test]
    fn test_export_async_is_not_recognized() {
        assert_eq!(classify("export async function run() {"), None);
    }

    #[test]
    fn test_arrow_forms() {
        let m = classify("    const f = (x) => {").unwrap();
        assert_eq!(m.kind, HeaderKind::Arrow);
        assert_eq!(m.indentation, "    ");
        assert_eq!(m.parameters, "x");

        assert_eq!(kind_of("let g = async (a, b) => {"), Some(HeaderKind::Arrow));

        let single = classify("var double = n => {").unwrap();
        assert_eq!(single.kind, HeaderKind::ArrowSingleParam);
        assert_eq!(single.name, "double");
        assert_eq!(single.parameters, "n");

        let single_async = classify("const fetchIt = async url => {").unwrap();
        assert_eq!(single_async.kind, HeaderKind::ArrowSingleParam);
        assert_eq!(single_async.parameters, "url");
    }

    #[test]
    fn test_assigned_expression_targets() {
        let m = classify("window.saveData = function (data) {").unwrap();
        assert_eq!(m.kind, HeaderKind::AssignedExpression);
        assert_eq!(m.name, "window.saveData");

        let m = classify("handlers['click'] = async function(e) {").unwrap();
        assert_eq!(m.kind, HeaderKind::AssignedExpression);
        assert_eq!(m.name, "handlers['click']");
        assert_eq!(m.parameters, "e");
    }

    #[test]
    fn test_object_method_with_function_keyword() {
        let m = classify("    render: function(state, props) {").unwrap();
        assert_eq!(m.kind, HeaderKind::ObjectMethod);
        assert_eq!(m.name, "render");
        assert_eq!(m.parameters, "state, props");
    }

    #[test]
    fn test_bare_method_shorthand() {
        let m = classify("  async $init(options) {").unwrap();
        assert_eq!(m.kind, HeaderKind::BareMethod);
        assert_eq!(m.name, "$init");

        assert_eq!(kind_of("constructor() {"), Some(HeaderKind::BareMethod));
    }

    #[test]
    fn test_control_flow_is_never_a_header() {
        for line in [
            "if (x > 0) {",
            "for (let i = 0; i < n; i++) {",
            "    while (queue.length) {",
            "switch (action.type) {",
            "} catch (err) {",
            "catch (err) {",
            "with (obj) {",
            "async if (x) {",
        ] {
            assert_eq!(classify(line), None, "line {:?} should not classify", line);
        }
    }

    #[test]
    fn test_reserved_prefix_falls_back_to_unprefixed_name() {
        let m = classify("asyncif(x) {").unwrap();
        assert_eq!(m.kind, HeaderKind::BareMethod);
        assert_eq!(m.name, "asyncif");

        let m = classify("iffy(x) {").unwrap();
        assert_eq!(m.name, "iffy");
    }

    #[test]
    fn test_header_must_fit_on_one_line() {
        assert_eq!(classify("function split(a,"), None);
        assert_eq!(classify("function later(a)"), None);
        assert_eq!(classify("function inline(a) { return a; }"), None);
        assert_eq!(classify("const f = (x) => x * 2;"), None);
    }

    #[test]
    fn test_line_terminators_and_trailing_space() {
        let m = classify("function greet(name) {  \r\n").unwrap();
        assert_eq!(m.name, "greet");
        assert_eq!(m.parameters, "name");
        assert!(classify("function greet(name) {\n").is_some());
    }

    #[test]
    fn test_parameters_kept_untrimmed() {
        let m = classify("function pad( a ) {").unwrap();
        assert_eq!(m.parameters, " a ");
        let m = classify("function noop() {").unwrap();
        assert_eq!(m.parameters, "");
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in HeaderKind::ALL {
            assert_eq!(kind.as_str().parse::<HeaderKind>(), Ok(kind));
        }
        assert!("lambda".parse::<HeaderKind>().is_err());
    }

    #[test]
    fn test_priorities_follow_order() {
        let priorities: Vec<u8> = HeaderKind::ALL.iter().map(|k| k.priority()).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
