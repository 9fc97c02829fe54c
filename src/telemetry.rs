//! Diagnostic logging for the `statemap` binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. `RUST_LOG` overrides the default `warn`
/// level; `verbose` raises the crate's own spans to `debug`.
///
/// Logs go to stderr so stdout stays clean for reports and JSON.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(format!("{},statemap=debug", DEFAULT_FILTER))
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    // A subscriber may already be set (tests, embedding hosts).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
