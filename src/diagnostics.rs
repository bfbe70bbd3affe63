//! Logging setup and the wording of fatal and non-fatal problems.

use std::fmt::Display;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` overrides `default_level`.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Message for a broken invariant; these abort the whole pass.
pub fn error_message(msg: impl Display) -> String {
    format!("invariant violated: {}", msg)
}

/// Log a problem that only affects part of the output.
pub fn warn(msg: impl Display) {
    tracing::warn!("{}", msg);
}
