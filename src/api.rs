use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::CACHE_CONTROL, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::events::types::{EventFeed, SourceFilter, WorldEvent};
use crate::events::Aggregator;
use crate::page::{render_page, PageModel};

const FALLBACK_ERROR: &str = "Unexpected error while gathering events.";

pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("api_events_requests_total", "Requests served by /api/events.");
        describe_counter!(
            "api_events_errors_total",
            "Requests to /api/events that failed to gather events."
        );
    });
}

#[derive(Clone)]
pub struct AppState {
    feed: Arc<dyn EventFeed>,
}

impl AppState {
    pub fn new(feed: Arc<dyn EventFeed>) -> Self {
        Self { feed }
    }

    /// Production state: an aggregator over the configured upstream sources.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let aggregator = Aggregator::from_config(cfg)?;
        Ok(Self::new(Arc::new(aggregator)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }))
        .route("/api/events", get(list_events))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct EventsResponse {
    events: Vec<WorldEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn error_message(e: &anyhow::Error) -> String {
    let msg = e.to_string();
    if msg.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        msg
    }
}

async fn list_events(State(state): State<AppState>) -> Response {
    ensure_metrics_described();
    counter!("api_events_requests_total").increment(1);

    match state.feed.fetch_world_events().await {
        Ok(events) => (
            [(CACHE_CONTROL, "no-store")],
            Json(EventsResponse {
                events,
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            counter!("api_events_errors_total").increment(1);
            tracing::warn!(target: "api", error = ?e, "gathering events failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CACHE_CONTROL, "no-store")],
                Json(EventsResponse {
                    events: Vec::new(),
                    error: Some(error_message(&e)),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct PageQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// Initial page load: calls the collaborator directly, not over HTTP.
async fn index(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Html<String> {
    // Unknown selectors fall back to "all" rather than failing the page.
    let source = q
        .source
        .as_deref()
        .and_then(|s| s.parse::<SourceFilter>().ok())
        .unwrap_or_default();

    let (events, error) = match state.feed.fetch_world_events().await {
        Ok(events) => (events, None),
        Err(e) => {
            tracing::warn!(target: "api", error = ?e, "initial load failed");
            (Vec::new(), Some(error_message(&e)))
        }
    };

    let model = PageModel {
        events: &events,
        query: q.q.as_deref().unwrap_or_default(),
        source,
        error: error.as_deref(),
    };
    Html(render_page(&model, chrono::Utc::now()))
}
