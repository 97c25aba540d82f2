//! Run configuration.

use std::path::{Path, PathBuf};

use crate::formatter::FormatOptions;

/// Process-wide settings, built once from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Overwrite modified files in place.
    pub write: bool,
    /// Print the paths of modified files.
    pub list: bool,
    /// Print a unified diff for modified files.
    pub diff: bool,
    /// Report every formatter diagnostic.
    pub all_errors: bool,
    /// Comma-separated import prefixes grouped after third-party imports.
    pub local_prefix: Option<String>,
    /// Skip import fixing, formatting only.
    pub format_only: bool,
    /// Format as though every file lived in this directory.
    pub src_dir: Option<PathBuf>,
    /// Emit per-file progress on stderr.
    pub verbose: bool,
}

impl Config {
    /// `true` when none of list, write, or diff is set, so the formatted
    /// bytes go to the output sink unconditionally.
    #[must_use]
    pub fn passthrough(&self) -> bool {
        !(self.list || self.write || self.diff)
    }

    /// The formatter options derived from this configuration.
    #[must_use]
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            format_only: self.format_only,
            all_errors: self.all_errors,
            local_prefixes: self
                .local_prefix
                .as_deref()
                .map(split_prefixes)
                .unwrap_or_default(),
            ..FormatOptions::default()
        }
    }

    /// The path the formatter should treat `path` as.
    ///
    /// With a source directory configured this is `<src_dir>/<file name>`;
    /// otherwise it is `path` itself.
    #[must_use]
    pub fn target_for(&self, path: &Path) -> PathBuf {
        match (&self.src_dir, path.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            (Some(dir), None) => dir.join(path),
            (None, _) => path.to_path_buf(),
        }
    }
}

fn split_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
