//! Tracing setup.

use tracing_subscriber::{fmt, EnvFilter, prelude::*};

const DEFAULT_DIRECTIVES: &str = "info,chairspin=debug,tower_http=info,axum=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter,
/// e.g. `RUST_LOG=chairspin::wheel=trace,tower_http=debug`.
pub fn init() {
    if !try_init(DEFAULT_DIRECTIVES) {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Returns false when a subscriber was already set.
pub fn try_init(default_directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
