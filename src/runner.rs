//! Top-level driver: expand every argument, process every candidate, and
//! reduce the per-file outcomes into one exit status.

use std::collections::HashSet;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::{GoimportsError, Result};
use crate::processor::{FileOutcome, Processor};
use crate::resolver::{resolve, PathArg};

/// Exit status when any error was reported.
pub const EXIT_FAILURE: i32 = 2;

/// Everything that happened during one run, in traversal order.
#[derive(Debug, Default)]
pub struct RunSummary {
    outcomes: Vec<Result<FileOutcome>>,
}

impl RunSummary {
    fn record(&mut self, outcome: Result<FileOutcome>, report: &mut dyn Write) {
        if let Err(e) = &outcome {
            // Nowhere left to report a failing error stream.
            let _ = writeln!(report, "{e}");
        }
        self.outcomes.push(outcome);
    }

    /// Number of files processed without error.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Number of files the formatter changed.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Ok(FileOutcome::Changed)))
            .count()
    }

    /// Every error reported during the run.
    pub fn errors(&self) -> impl Iterator<Item = &GoimportsError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// `true` if any error was reported.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.errors().next().is_some()
    }

    /// `0` on full success, [`EXIT_FAILURE`] otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.failed() {
            EXIT_FAILURE
        } else {
            0
        }
    }

    fn finish(mut self, out: &mut dyn Write, report: &mut dyn Write) -> Self {
        if let Err(e) = out.flush() {
            self.record(Err(GoimportsError::Output(e)), report);
        }
        tracing::debug!(
            processed = self.processed(),
            changed = self.changed(),
            "run finished"
        );
        self
    }
}

/// Identity of a candidate for duplicate detection across arguments.
fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Process every path argument in order.
///
/// A file reached by more than one argument is processed once, under the
/// name it was first reached by. Errors are written to `report` as they
/// happen and never stop the run.
pub fn run_paths(
    args: &[String],
    processor: &Processor<'_>,
    out: &mut dyn Write,
    report: &mut dyn Write,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut seen = HashSet::new();
    for arg in args {
        let candidates = match resolve(&PathArg::parse(arg)) {
            Ok(c) => c,
            Err(e) => {
                summary.record(Err(e), report);
                continue;
            }
        };
        for candidate in candidates {
            let outcome = match candidate {
                Ok(path) => {
                    if !seen.insert(identity(&path)) {
                        tracing::debug!("skipping {}: already processed", path.display());
                        continue;
                    }
                    processor.process_path(&path, out)
                }
                Err(e) => Err(e),
            };
            summary.record(outcome, report);
        }
    }
    summary.finish(out, report)
}

/// Process a single document from `input` (no path arguments).
pub fn run_stdin(
    input: &mut dyn Read,
    processor: &Processor<'_>,
    out: &mut dyn Write,
    report: &mut dyn Write,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let outcome = processor.process_reader(input, out);
    summary.record(outcome, report);
    summary.finish(out, report)
}
