//! Tracing subscriber setup for solver logs.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "planwright_solver=info";

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Safe to call multiple times - only the first call has effect. When the
/// application already installed a global subscriber, that one is kept.
pub fn init() {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    });
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
