//! Development-time tracing for the CLI.
//!
//! Diagnostics go to stderr and are controlled by `RUST_LOG`; the product
//! output of a run (summaries, traces, reports) is unaffected.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` selects the level, `warn` if
/// unset.
///
/// ```bash
/// RUST_LOG=chorus_runner=debug chorus run --model value-sync
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
