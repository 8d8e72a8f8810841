// src/lib.rs
// Public library surface for the server binary, feed_watch, and integration tests.

pub mod api;
pub mod config;
pub mod events;
pub mod feed;
pub mod metrics;
pub mod page;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::events::types::{EventFeed, EventSource, SourceFilter, WorldEvent};
pub use crate::feed::{FeedController, HttpFeedTransport};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing for local binaries. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init: a second call (or a host-installed subscriber) is not an error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
