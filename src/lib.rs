pub mod config;
pub mod diff;
pub mod errors;
pub mod formatter;
mod fs_util;
pub mod processor;
pub mod resolver;
pub mod runner;

// Re-export key types at crate root for convenience.
pub use config::Config;
pub use diff::unified_diff;
pub use errors::{GoimportsError, Result};
pub use formatter::{FormatError, FormatOptions, GoFormatter, SourceFormatter, SyntaxError};
pub use processor::{FileOutcome, Processor, STDIN_NAME};
pub use resolver::{resolve, Candidates, PathArg};
pub use runner::{run_paths, run_stdin, RunSummary, EXIT_FAILURE};
