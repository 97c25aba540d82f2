use std::io;
use std::path::PathBuf;

use clap::Parser;

use goimports_all::{run_paths, run_stdin, Config, GoFormatter, Processor, EXIT_FAILURE};

mod logging;

#[derive(Parser)]
#[command(
    name = "goimports-all",
    version,
    about = "Format Go sources and fix their imports, accepting ./... patterns",
    override_usage = "goimports-all [flags] [path ...]"
)]
pub struct Cli {
    /// Files, directories, or recursive patterns (`./...`); reads standard input when omitted
    paths: Vec<String>,

    /// Write result to (source) file instead of stdout
    #[arg(short, long)]
    write: bool,

    /// List files whose formatting differs
    #[arg(short, long)]
    list: bool,

    /// Display diffs instead of rewriting files
    #[arg(short, long)]
    diff: bool,

    /// Report all errors (not just the first 10)
    #[arg(short = 'e', long)]
    all_errors: bool,

    /// Put imports beginning with this string after 3rd-party packages; comma-separated list
    /// (long form only: `--local`, not `-local`)
    #[arg(long, value_name = "PREFIX")]
    local: Option<String>,

    /// Don't fix imports, only format
    #[arg(long)]
    format_only: bool,

    /// Choose imports as if source code is from DIR (long form only: `--srcdir`, not `-srcdir`)
    #[arg(long, value_name = "DIR")]
    srcdir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Config {
            write: cli.write,
            list: cli.list,
            diff: cli.diff,
            all_errors: cli.all_errors,
            local_prefix: cli.local.clone(),
            format_only: cli.format_only,
            src_dir: cli.srcdir.clone(),
            verbose: cli.verbose,
        }
    }
}

/// Run the tool and return the process exit status.
pub fn run(cli: Cli) -> i32 {
    let config = Config::from(&cli);
    logging::init(config.verbose);

    if cli.paths.is_empty() && config.write {
        eprintln!("goimports-all: cannot use -w with standard input");
        return EXIT_FAILURE;
    }

    let formatter = GoFormatter;
    let processor = Processor::new(&config, &formatter);
    let mut out = io::stdout().lock();
    let mut report = io::stderr();

    let summary = if cli.paths.is_empty() {
        run_stdin(&mut io::stdin().lock(), &processor, &mut out, &mut report)
    } else {
        run_paths(&cli.paths, &processor, &mut out, &mut report)
    };
    summary.exit_code()
}
