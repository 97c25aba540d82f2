//! Path argument expansion.
//!
//! Turns one command-line argument (a file, a directory, or a `./...`
//! pattern) into a lazy stream of candidate Go source files.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, FilterEntry, WalkDir};

use crate::errors::{GoimportsError, Result};

/// Suffix marking a recursive pattern (`./...`, `dir/...`, or bare `...`).
pub const RECURSIVE_MARKER: &str = "...";

/// Directory name whose subtree is never traversed.
pub const VENDOR_DIR: &str = "vendor";

/// File suffix of candidate sources.
pub const SOURCE_SUFFIX: &str = ".go";

/// A parsed path argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathArg {
    /// `<dir>/...` or `...`: every candidate beneath `dir`.
    Recursive(PathBuf),
    /// A literal file or directory path.
    Plain(PathBuf),
}

impl PathArg {
    /// Parse a command-line argument.
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        if arg == RECURSIVE_MARKER {
            return Self::Recursive(PathBuf::from("."));
        }
        match arg.strip_suffix(RECURSIVE_MARKER) {
            Some(dir) if dir.ends_with('/') => {
                let dir = dir.trim_end_matches('/');
                if dir.is_empty() || dir == "." {
                    Self::Recursive(PathBuf::from("."))
                } else {
                    Self::Recursive(PathBuf::from(dir))
                }
            }
            _ => Self::Plain(PathBuf::from(arg)),
        }
    }

    /// The filesystem path the argument refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Recursive(p) | Self::Plain(p) => p,
        }
    }
}

/// Returns `true` if `name` is an eligible source file name.
#[must_use]
pub fn is_source_name(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(SOURCE_SUFFIX)
}

/// Returns `true` for directory names whose subtree is skipped.
#[must_use]
pub fn is_excluded_dir_name(name: &str) -> bool {
    name == VENDOR_DIR || name.starts_with('.')
}

type EntryFilter = fn(&DirEntry) -> bool;

/// Lazy, single-pass sequence of candidate files for one argument.
///
/// Traversal errors are yielded in place and do not end the walk.
pub struct Candidates {
    inner: Inner,
}

enum Inner {
    Single(Option<PathBuf>),
    Walk {
        entries: FilterEntry<walkdir::IntoIter, EntryFilter>,
        strip_cur_dir: bool,
    },
}

impl Iterator for Candidates {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Single(path) => path.take().map(Ok),
            Inner::Walk {
                entries,
                strip_cur_dir,
            } => loop {
                let entry = match entries.next()? {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(GoimportsError::from(e))),
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                if !is_source_name(&entry.file_name().to_string_lossy()) {
                    continue;
                }
                let path = entry.into_path();
                if *strip_cur_dir {
                    if let Ok(rel) = path.strip_prefix(".") {
                        return Some(Ok(rel.to_path_buf()));
                    }
                }
                return Some(Ok(path));
            },
        }
    }
}

/// Prune hidden entries and `vendor` directories below the walk root.
///
/// The root itself is always kept so that `.`, `./...`, and an explicitly
/// named excluded directory can still be walked.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        !is_excluded_dir_name(&name)
    } else {
        !name.starts_with('.')
    }
}

/// Drop `.` components so walk output reads `sub/a.go`, not `./sub/a.go`.
fn clean(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

fn walk(root: &Path) -> Candidates {
    let root = clean(root);
    let strip_cur_dir = root == Path::new(".");
    let entries = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(keep_entry as EntryFilter);
    Candidates {
        inner: Inner::Walk {
            entries,
            strip_cur_dir,
        },
    }
}

/// Resolve one argument into its candidate files.
///
/// A plain regular file yields exactly itself, unfiltered. Directories and
/// recursive patterns are walked depth-first in lexical order with the same
/// exclusion rules.
///
/// # Errors
///
/// Returns [`GoimportsError::PathLookup`] if the argument does not exist or
/// cannot be inspected.
pub fn resolve(arg: &PathArg) -> Result<Candidates> {
    let path = arg.path();
    let meta = fs::metadata(path).map_err(|source| GoimportsError::PathLookup {
        path: path.to_path_buf(),
        source,
    })?;

    match arg {
        PathArg::Recursive(_) => {
            tracing::debug!("expanding {} recursively", path.display());
            Ok(walk(path))
        }
        PathArg::Plain(_) if meta.is_dir() => Ok(walk(path)),
        PathArg::Plain(_) => Ok(Candidates {
            inner: Inner::Single(Some(path.to_path_buf())),
        }),
    }
}
