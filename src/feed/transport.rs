use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use std::time::Duration;

use crate::events::types::WorldEvent;

/// Where the feed controller gets a fresh event list from.
#[async_trait::async_trait]
pub trait FeedTransport: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<WorldEvent>>;
}

#[derive(Debug, Deserialize)]
struct EventsPayload {
    events: Vec<WorldEvent>,
}

/// `GET {base}/api/events`, uncached.
#[derive(Clone)]
pub struct HttpFeedTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpFeedTransport {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Requests that take longer than `timeout` fail as network errors.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building feed http client")?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}/api/events", base_url.trim_end_matches('/')),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl FeedTransport for HttpFeedTransport {
    async fn fetch_events(&self) -> Result<Vec<WorldEvent>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target: "feed", error = ?e, endpoint = %self.endpoint, "refresh request failed");
                anyhow!("Network error while refreshing events.")
            })?;

        if !resp.status().is_success() {
            tracing::warn!(target: "feed", status = %resp.status(), "refresh returned non-success status");
            bail!("Unable to refresh global events.");
        }

        let payload: EventsPayload = resp.json().await.map_err(|e| {
            tracing::warn!(target: "feed", error = ?e, "refresh body did not parse");
            anyhow!("Received a malformed events payload.")
        })?;
        Ok(payload.events)
    }
}
