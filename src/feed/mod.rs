// src/feed/mod.rs
// Client-side view logic: formatting, freshness, filtering, and the refresh controller.
pub mod controller;
pub mod filter;
pub mod relative_time;
pub mod status;
pub mod transport;

pub use controller::{FeedController, FeedPhase, FeedView, RefreshOutcome};
pub use filter::{filter_events, matches_event};
pub use relative_time::{format_relative, format_relative_at, parse_published_at};
pub use status::{build_status, newest_event, STATUS_PLACEHOLDER};
pub use transport::{FeedTransport, HttpFeedTransport};
