//! Diagnostic logging for the CLI.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber. `RUST_LOG` overrides the default level.
pub fn init(verbose: bool) {
    let default = if verbose { "simjob=debug,warn" } else { "simjob=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second call (tests driving `run` in-process) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
