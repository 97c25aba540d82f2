//! Go source formatting: the [`SourceFormatter`] seam and the built-in engine.
//!
//! The rest of the crate only talks to [`SourceFormatter`]. [`GoFormatter`]
//! is a small, idempotent normalizer: it checks lexical structure, cleans up
//! whitespace and indentation, and sorts and groups parenthesized import
//! blocks. It never touches the filesystem.

mod imports;
mod scan;

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Diagnostics beyond this count are dropped unless `all_errors` is set.
pub const MAX_REPORTED_ERRORS: usize = 10;

/// Options forwarded to the formatter on every call.
///
/// Built once per run from the command-line configuration and shared by
/// reference; nothing mutates it after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Column width of one tab stop.
    pub tab_width: usize,
    /// Indent with tabs instead of spaces.
    pub tab_indent: bool,
    /// Keep comments.
    pub comments: bool,
    /// Accept source without a `package` clause.
    pub fragment: bool,
    /// Leave imports alone and only format.
    pub format_only: bool,
    /// Report every diagnostic instead of the first [`MAX_REPORTED_ERRORS`].
    pub all_errors: bool,
    /// Import path prefixes grouped after third-party imports.
    pub local_prefixes: Vec<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tab_width: 8,
            tab_indent: true,
            comments: true,
            fragment: true,
            format_only: false,
            all_errors: false,
            local_prefixes: Vec::new(),
        }
    }
}

/// A diagnostic with a 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    #[must_use]
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Why the formatter could not process a source.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The source is not valid UTF-8.
    #[error("invalid UTF-8 encoding at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// The source failed the lexical checks. Never empty.
    #[error("{}", summarize(.0))]
    Syntax(Vec<SyntaxError>),
}

fn summarize(errors: &[SyntaxError]) -> String {
    match errors {
        [] => "syntax error".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more errors)", rest.len()),
    }
}

/// Formats one source buffer.
///
/// `target` is the path the source should be treated as living at. It may
/// differ from the file actually read (see `--srcdir`) and is what
/// implementations should use for import resolution.
pub trait SourceFormatter {
    /// Return the formatted bytes for `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the source cannot be processed.
    fn format(
        &self,
        target: &Path,
        source: &[u8],
        options: &FormatOptions,
    ) -> Result<Vec<u8>, FormatError>;
}

/// The built-in Go normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoFormatter;

impl SourceFormatter for GoFormatter {
    fn format(
        &self,
        _target: &Path,
        source: &[u8],
        options: &FormatOptions,
    ) -> Result<Vec<u8>, FormatError> {
        let text = std::str::from_utf8(source).map_err(|e| FormatError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;
        let text = text.replace("\r\n", "\n");

        let scanned = scan::scan(&text);
        let mut errors = scanned.errors;
        if !options.fragment {
            check_package_clause(scanned.first_token.as_ref(), &mut errors);
        }
        if !errors.is_empty() {
            errors.sort_by_key(|e| (e.line, e.column));
            if !options.all_errors {
                errors.truncate(MAX_REPORTED_ERRORS);
            }
            return Err(FormatError::Syntax(errors));
        }

        let mut lines = normalize_lines(&text, &scanned.lines, options);
        if !options.format_only {
            imports::sort_import_blocks(&mut lines, &options.local_prefixes);
        }
        Ok(render(&lines).into_bytes())
    }
}

fn check_package_clause(first: Option<&scan::FirstToken>, errors: &mut Vec<SyntaxError>) {
    match first {
        Some((_, _, word)) if word == "package" => {}
        Some((line, col, word)) => errors.push(SyntaxError::new(
            *line,
            *col,
            format!("expected 'package', found '{word}'"),
        )),
        None => errors.push(SyntaxError::new(1, 1, "expected 'package', found 'EOF'")),
    }
}

/// One output line. `verbatim` lines begin inside a raw string literal and
/// are never reindented, dropped, or collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    pub text: String,
    pub verbatim: bool,
}

impl Line {
    pub(crate) fn code(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            verbatim: false,
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        !self.verbatim && self.text.is_empty()
    }
}

fn normalize_lines(text: &str, spans: &[scan::LineSpan], options: &FormatOptions) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::new();
    for (raw, span) in text.split('\n').zip(spans) {
        let trimmed = if span.ends_in_raw {
            raw.to_string()
        } else {
            raw.trim_end().to_string()
        };

        if span.starts_in_raw {
            out.push(Line {
                text: trimmed,
                verbatim: true,
            });
            continue;
        }

        if trimmed.is_empty() {
            // Drops leading blanks and collapses runs to one.
            if out.last().is_some_and(|l| !l.is_blank()) {
                out.push(Line::code(""));
            }
            continue;
        }

        if !options.comments && trimmed.trim_start().starts_with("//") {
            continue;
        }

        let text = if options.tab_indent {
            reindent(&trimmed, options.tab_width)
        } else {
            trimmed
        };
        out.push(Line::code(text));
    }

    while out.last().is_some_and(Line::is_blank) {
        out.pop();
    }
    out
}

/// Replace each run of `tab_width` leading spaces with a tab.
fn reindent(line: &str, tab_width: usize) -> String {
    if tab_width == 0 {
        return line.to_string();
    }
    let body = line.trim_start_matches([' ', '\t']);
    let leading = &line[..line.len() - body.len()];

    let mut indent = String::with_capacity(leading.len());
    let mut spaces = 0;
    for c in leading.chars() {
        if c == ' ' {
            spaces += 1;
            if spaces == tab_width {
                indent.push('\t');
                spaces = 0;
            }
        } else {
            indent.extend(std::iter::repeat(' ').take(spaces));
            spaces = 0;
            indent.push('\t');
        }
    }
    indent.extend(std::iter::repeat(' ').take(spaces));
    indent.push_str(body);
    indent
}

fn render(lines: &[Line]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt_with(src: &str, options: &FormatOptions) -> Result<String, FormatError> {
        GoFormatter
            .format(Path::new("a.go"), src.as_bytes(), options)
            .map(|b| String::from_utf8(b).unwrap())
    }

    fn fmt(src: &str) -> String {
        fmt_with(src, &FormatOptions::default()).unwrap()
    }

    #[test]
    fn default_options_match_fixed_constants() {
        let o = FormatOptions::default();
        assert_eq!(o.tab_width, 8);
        assert!(o.tab_indent && o.comments && o.fragment);
        assert!(!o.format_only && !o.all_errors);
    }

    #[test]
    fn formatted_source_is_unchanged() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {\n\tfmt.Println(os.Args)\n}\n";
        assert_eq!(fmt(src), src);
    }

    #[test]
    fn trailing_whitespace_and_blank_runs_are_cleaned() {
        let src = "\n\npackage main   \n\n\n\nfunc main() {}\t\n\n\n";
        assert_eq!(fmt(src), "package main\n\nfunc main() {}\n");
    }

    #[test]
    fn crlf_becomes_lf() {
        assert_eq!(fmt("package main\r\n\r\nvar x = 1\r\n"), "package main\n\nvar x = 1\n");
    }

    #[test]
    fn leading_spaces_become_tabs() {
        let src = "package main\n\nfunc f() {\n        return\n    }\n";
        assert_eq!(fmt(src), "package main\n\nfunc f() {\n\treturn\n    }\n");
    }

    #[test]
    fn tab_indent_off_keeps_spaces() {
        let opts = FormatOptions {
            tab_indent: false,
            ..FormatOptions::default()
        };
        let src = "package main\n\nfunc f() {\n        return\n}\n";
        assert_eq!(fmt_with(src, &opts).unwrap(), src);
    }

    #[test]
    fn raw_string_contents_are_preserved() {
        let src = "package main\n\nvar s = `line one   \n\n\n        indented  \n`\n";
        assert_eq!(fmt(src), src);
    }

    #[test]
    fn imports_are_sorted_and_grouped() {
        let src = "package main\n\nimport (\n\t\"github.com/pkg/errors\"\n\t\"os\"\n\t\"fmt\"\n)\n";
        assert_eq!(
            fmt(src),
            "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n\n\t\"github.com/pkg/errors\"\n)\n"
        );
    }

    #[test]
    fn local_prefix_group_comes_last() {
        let opts = FormatOptions {
            local_prefixes: vec!["example.com/me".to_string()],
            ..FormatOptions::default()
        };
        let src = "package main\n\nimport (\n\t\"example.com/me/util\"\n\t\"github.com/x/y\"\n\t\"strings\"\n)\n";
        assert_eq!(
            fmt_with(src, &opts).unwrap(),
            "package main\n\nimport (\n\t\"strings\"\n\n\t\"github.com/x/y\"\n\n\t\"example.com/me/util\"\n)\n"
        );
    }

    #[test]
    fn format_only_leaves_imports_alone() {
        let opts = FormatOptions {
            format_only: true,
            ..FormatOptions::default()
        };
        let src = "package main\n\nimport (\n\t\"os\"\n\t\"fmt\"\n)\n";
        assert_eq!(fmt_with(src, &opts).unwrap(), src);
    }

    #[test]
    fn comments_off_drops_line_comments() {
        let opts = FormatOptions {
            comments: false,
            ..FormatOptions::default()
        };
        let src = "package main\n\n// doc\nvar x = 1 // trailing\n";
        assert_eq!(
            fmt_with(src, &opts).unwrap(),
            "package main\n\nvar x = 1 // trailing\n"
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let src = "package main\r\n\r\n\r\nimport (\r\n  \"z.io/a\"\r\n\t\"bytes\"\r\n\t\"bytes\"\r\n)\r\nfunc f() {   \r\n        _ = bytes.MinRead  \r\n}\r\n\r\n";
        let once = fmt(src);
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn syntax_errors_are_reported_with_positions() {
        let err = fmt_with("package main\n\nfunc f() {\n", &FormatOptions::default()).unwrap_err();
        match err {
            FormatError::Syntax(errs) => {
                assert_eq!(errs, vec![SyntaxError::new(4, 1, "expected '}', found 'EOF'")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn errors_are_capped_unless_all_errors() {
        let src = format!("package main\n{}", ")\n".repeat(15));
        let capped = fmt_with(&src, &FormatOptions::default()).unwrap_err();
        let all = fmt_with(
            &src,
            &FormatOptions {
                all_errors: true,
                ..FormatOptions::default()
            },
        )
        .unwrap_err();
        match (capped, all) {
            (FormatError::Syntax(c), FormatError::Syntax(a)) => {
                assert_eq!(c.len(), MAX_REPORTED_ERRORS);
                assert_eq!(a.len(), 15);
            }
            other => panic!("unexpected errors: {other:?}"),
        }
    }

    #[test]
    fn non_fragment_requires_package_clause() {
        let opts = FormatOptions {
            fragment: false,
            ..FormatOptions::default()
        };
        let err = fmt_with("func f() {}\n", &opts).unwrap_err();
        assert_eq!(err.to_string(), "1:1: expected 'package', found 'func'");
        assert!(fmt_with("// c\npackage p\n", &opts).is_ok());
        assert!(fmt("func f() {}\n").starts_with("func"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = GoFormatter
            .format(Path::new("a.go"), b"package p\n\xff\n", &FormatOptions::default())
            .unwrap_err();
        assert!(matches!(err, FormatError::InvalidUtf8 { offset: 10 }));
    }

    #[test]
    fn empty_source_stays_empty() {
        assert_eq!(fmt(""), "");
        assert_eq!(fmt("\n\n  \n"), "");
    }

    #[test]
    fn summary_mentions_extra_errors() {
        let err = FormatError::Syntax(vec![
            SyntaxError::new(1, 1, "a"),
            SyntaxError::new(2, 1, "b"),
            SyntaxError::new(3, 1, "c"),
        ]);
        assert_eq!(err.to_string(), "1:1: a (and 2 more errors)");
    }
}
