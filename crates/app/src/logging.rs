//! Logging subscriber initialisation.

use tracing_subscriber::EnvFilter;

const FALLBACK_LOG_LEVEL: &str = "warn";

/// Install the global `tracing` subscriber.
///
/// `log_level` already falls back to `RUST_LOG` when no flag is given, so it is
/// the only source of filter directives. Logs go to stderr so command output on
/// stdout stays clean. Calling this twice is harmless.
pub fn init(log_level: &str) {
    _ = tracing_subscriber::fmt()
        .with_env_filter(filter(log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse `log_level` as filter directives, falling back to warnings only.
fn filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LOG_LEVEL))
}
