//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr through `tracing-subscriber`'s fmt layer, so
//! stdout stays clean for rendered HTML and `list --json`.
//!
//! # Level Resolution
//!
//! 1. `RUST_LOG`, when set and parseable
//! 2. `--log-level` from the command line
//! 3. Default: `"warn"`
//!
//! Initialization is idempotent: only the first call installs a subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LEVEL: &str = "warn";

/// Build the filter for a requested level, letting `RUST_LOG` win.
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_LEVEL)))
}

/// Install the global subscriber.
pub fn init_logging(level: Option<&str>) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt_layer)
        .try_init();
}
