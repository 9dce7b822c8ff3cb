//! Logging initialization for the CLI
//!
//! `RUST_LOG` wins when set; otherwise `--verbose` selects debug-level
//! output for the geoadmin crates and warnings for everything else.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber. Safe to call once per process;
/// a second call is ignored so tests can run commands back to back.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "warn,geoadmin=debug,geoadmin_cli=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
