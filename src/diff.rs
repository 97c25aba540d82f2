//! Unified diff rendering for `--diff`.

use std::path::Path;

use similar::TextDiff;

use crate::errors::{GoimportsError, Result};

/// Lines of context around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Render a unified diff of `original` against `formatted`.
///
/// Both header lines name `path` with the conventional `a/` and `b/`
/// prefixes. Identical inputs produce an empty string.
///
/// # Errors
///
/// Returns [`GoimportsError::MalformedDiff`] if a non-empty rendering is
/// missing its header or hunk lines. `similar` always emits both headers and
/// a hunk line for a non-empty diff, so this only fires if the renderer
/// breaks that contract.
pub fn unified_diff(original: &[u8], formatted: &[u8], path: &Path) -> Result<String> {
    let old = String::from_utf8_lossy(original);
    let new = String::from_utf8_lossy(formatted);
    let name = path.display().to_string();

    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());
    let rendered = diff
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("a/{name}"), &format!("b/{name}"))
        .to_string();

    check_rendering(rendered, path)
}

/// A non-empty diff has at least the two headers and one `@@` line.
fn check_rendering(rendered: String, path: &Path) -> Result<String> {
    if rendered.is_empty() || rendered.lines().count() >= 3 {
        return Ok(rendered);
    }
    Err(GoimportsError::MalformedDiff {
        path: path.to_path_buf(),
    })
}
