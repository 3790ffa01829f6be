//! Process-wide `tracing` subscriber.
//!
//! # Responsibilities
//! - Install the subscriber that prints console mirror lines, sink
//!   fallback reports and framework diagnostics (tower_http)
//! - Honour `RUST_LOG`, falling back to the configured filter
//!
//! # Design Decisions
//! - Targets are hidden; console mirror lines carry their own
//!   `[SEVERITY] [context]` prefix
//! - Installing twice is tolerated (tests build several servers)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
