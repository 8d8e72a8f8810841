//! Terminal feed: polls a running server's `/api/events` through the feed controller
//! and prints the filtered view after every refresh.
//!
//! Env: WORLD_EVENTS_ENDPOINT, WORLD_EVENTS_QUERY, WORLD_EVENTS_SOURCE, WATCH_INTERVAL_SECS,
//! WATCH_TIMEOUT_SECS.

use std::time::Duration;

use world_event_agent::feed::{format_relative, FeedController, FeedView, RefreshOutcome};
use world_event_agent::{HttpFeedTransport, SourceFilter};

fn print_view(view: &FeedView) {
    println!("🛰️  {}", view.status);
    if let Some(err) = &view.error {
        println!("!! {err}");
    }
    if view.is_empty() {
        println!("Nothing matches your filters right now. Try adjusting the source or search query.");
        return;
    }
    for ev in &view.events {
        println!(
            "[{}] {} ({})\n    {}",
            ev.source_name,
            ev.title,
            format_relative(&ev.published_at),
            ev.url
        );
    }
    println!("-- {} of {} events", view.events.len(), view.total);
}

fn env_secs(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
        .max(1)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    world_event_agent::init_tracing("feed=info,warn");

    let endpoint = std::env::var("WORLD_EVENTS_ENDPOINT")
        .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let interval_secs = env_secs("WATCH_INTERVAL_SECS", 300);
    let timeout_secs = env_secs("WATCH_TIMEOUT_SECS", 15);
    let source = match std::env::var("WORLD_EVENTS_SOURCE") {
        Ok(s) => s.parse::<SourceFilter>()?,
        Err(_) => SourceFilter::All,
    };

    let transport = HttpFeedTransport::with_timeout(&endpoint, Duration::from_secs(timeout_secs))?;
    tracing::info!(
        endpoint = transport.endpoint(),
        interval_secs,
        timeout_secs,
        "feed_watch starting"
    );

    let controller = FeedController::new(transport, Vec::new());
    controller.set_query(std::env::var("WORLD_EVENTS_QUERY").unwrap_or_default());
    controller.set_source(source);

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        ticker.tick().await;
        match controller.refresh().await {
            RefreshOutcome::Refreshed(n) => tracing::debug!(events = n, "refreshed"),
            RefreshOutcome::Failed(msg) => tracing::debug!(error = %msg, "refresh failed"),
            RefreshOutcome::Skipped => continue,
        }
        print_view(&controller.view());
    }
}
