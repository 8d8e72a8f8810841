//! World Event Agent — Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, the event aggregator, and metrics.

use shuttle_axum::ShuttleAxum;
use world_event_agent::{api, config::AppConfig, metrics::Metrics, AppState};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - WORLD_EVENTS_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("WORLD_EVENTS_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    world_event_agent::init_tracing("events=info,feed=info,api=info,warn");
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = AppConfig::load()?;
    let state = AppState::from_config(&cfg)?;
    let mut router = api::router(state);

    match Metrics::init(cfg.fetch.max_events) {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "metrics disabled"),
    }

    tracing::info!(max_events = cfg.fetch.max_events, "world event agent ready");
    Ok(router.into())
}
