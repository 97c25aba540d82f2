use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter directive.
pub(crate) const LOG_ENV: &str = "GOIMPORTS_ALL_LOG";

/// Install the stderr subscriber.
///
/// `LOG_ENV` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `warn`.
pub(crate) fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
