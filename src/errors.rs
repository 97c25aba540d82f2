use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::formatter::FormatError;

/// Errors that can occur while resolving, formatting, or reporting a file.
///
/// Every variant is local to one path argument or one candidate file; the
/// driver reports it and moves on to the next one.
#[derive(Error, Debug)]
pub enum GoimportsError {
    /// A path argument does not name an existing file or directory.
    #[error("{}: {source}", .path.display())]
    PathLookup {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A directory entry could not be read during traversal.
    #[error("{source}")]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    /// Reading the source bytes failed.
    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The formatter rejected the content.
    #[error("{}", render_format_error(.target, .source))]
    Format { target: PathBuf, source: FormatError },

    /// Writing the formatted content back to disk failed.
    #[error("{}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rendered diff output lacked its header lines.
    #[error("{}: unexpected diff output", .path.display())]
    MalformedDiff { path: PathBuf },

    /// Writing to the output sink failed.
    #[error("write error: {0}")]
    Output(#[source] std::io::Error),
}

/// One `target:line:col: message` line per diagnostic.
fn render_format_error(target: &Path, err: &FormatError) -> String {
    let name = target.display();
    match err {
        FormatError::Syntax(errors) => errors
            .iter()
            .map(|e| format!("{name}:{e}"))
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("{name}: {other}"),
    }
}

/// Convenience alias for `Result<T, GoimportsError>`.
pub type Result<T> = std::result::Result<T, GoimportsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::SyntaxError;

    #[test]
    fn format_error_prefixes_every_diagnostic_with_target() {
        let err = GoimportsError::Format {
            target: PathBuf::from("pkg/a.go"),
            source: FormatError::Syntax(vec![
                SyntaxError::new(3, 5, "unexpected ')'"),
                SyntaxError::new(9, 1, "expected '}', found 'EOF'"),
            ]),
        };
        assert_eq!(
            err.to_string(),
            "pkg/a.go:3:5: unexpected ')'\npkg/a.go:9:1: expected '}', found 'EOF'"
        );
    }

    #[test]
    fn format_error_non_syntax_is_single_line() {
        let err = GoimportsError::Format {
            target: PathBuf::from("x.go"),
            source: FormatError::InvalidUtf8 { offset: 7 },
        };
        assert_eq!(err.to_string(), "x.go: invalid UTF-8 encoding at byte 7");
    }

    #[test]
    fn path_lookup_names_the_path() {
        let err = GoimportsError::PathLookup {
            path: PathBuf::from("missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "missing: not found");
    }
}
