//! Per-file processing: read, format, compare, dispose.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::config::Config;
use crate::diff::unified_diff;
use crate::errors::{GoimportsError, Result};
use crate::formatter::{FormatOptions, SourceFormatter};
use crate::fs_util::write_in_place;

/// Name used for the standard input stream in output and diagnostics.
pub const STDIN_NAME: &str = "<standard input>";

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The formatter returned the input unchanged.
    Unchanged,
    /// The formatter changed the input.
    Changed,
}

/// Runs sources through a [`SourceFormatter`] and applies the configured
/// dispositions.
pub struct Processor<'a> {
    config: &'a Config,
    options: FormatOptions,
    formatter: &'a dyn SourceFormatter,
}

impl<'a> Processor<'a> {
    #[must_use]
    pub fn new(config: &'a Config, formatter: &'a dyn SourceFormatter) -> Self {
        Self {
            config,
            options: config.format_options(),
            formatter,
        }
    }

    /// Process the file at `path`, writing list/diff/passthrough output to `out`.
    ///
    /// # Errors
    ///
    /// Returns the first failure among reading, formatting, writing back,
    /// rendering the diff, and writing to `out`.
    pub fn process_path(&self, path: &Path, out: &mut dyn Write) -> Result<FileOutcome> {
        tracing::debug!("processing {}", path.display());
        let src = fs::read(path).map_err(|source| GoimportsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.dispose(path, Some(path), &src, out)
    }

    /// Process one document read from `input` (standard input mode).
    ///
    /// The result is never written back anywhere but `out`.
    ///
    /// # Errors
    ///
    /// As for [`Processor::process_path`], minus the write-back step.
    pub fn process_reader(&self, input: &mut dyn Read, out: &mut dyn Write) -> Result<FileOutcome> {
        let name = Path::new(STDIN_NAME);
        tracing::debug!("processing {STDIN_NAME}");
        let mut src = Vec::new();
        input
            .read_to_end(&mut src)
            .map_err(|source| GoimportsError::Read {
                path: name.to_path_buf(),
                source,
            })?;
        self.dispose(name, None, &src, out)
    }

    fn dispose(
        &self,
        name: &Path,
        file: Option<&Path>,
        src: &[u8],
        out: &mut dyn Write,
    ) -> Result<FileOutcome> {
        let target = self.config.target_for(name);
        let res = self
            .formatter
            .format(&target, src, &self.options)
            .map_err(|source| GoimportsError::Format { target, source })?;

        let changed = res.as_slice() != src;
        if changed {
            if self.config.list {
                writeln!(out, "{}", name.display()).map_err(GoimportsError::Output)?;
            }
            if self.config.write {
                if let Some(path) = file {
                    write_in_place(path, &res).map_err(|source| GoimportsError::Write {
                        path: path.to_path_buf(),
                        source,
                    })?;
                }
            }
            if self.config.diff {
                let diff = unified_diff(src, &res, name)?;
                out.write_all(diff.as_bytes())
                    .map_err(GoimportsError::Output)?;
            }
        }

        if self.config.passthrough() {
            out.write_all(&res).map_err(GoimportsError::Output)?;
        }

        Ok(if changed {
            FileOutcome::Changed
        } else {
            FileOutcome::Unchanged
        })
    }
}
