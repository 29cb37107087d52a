use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Build the log dispatcher used by the CLI
///
/// Honours `RUST_LOG` when set; otherwise logs warnings, or debug output when
/// `verbose` is true. Output goes to stderr so it never mixes with reports.
pub fn build_dispatch(verbose: bool) -> Dispatch {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    Dispatch::new(subscriber)
}
