// src/events/providers/reddit.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use metrics::{counter, histogram};
use serde::Deserialize;

use super::{fetch_body, Mode};
use crate::events::types::{EventProvider, EventSource, WorldEvent};

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    permalink: String,
    url: Option<String>,
    created_utc: Option<f64>,
    link_flair_text: Option<String>,
    domain: Option<String>,
    #[serde(default)]
    stickied: bool,
}

// Missing or out-of-range timestamps become "", which the feed treats as malformed.
fn unix_to_rfc3339(secs: Option<f64>) -> String {
    secs.filter(|s| s.is_finite())
        .and_then(|s| DateTime::from_timestamp(s as i64, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Reddit r/worldnews listing (`top.json` / `hot.json`).
pub struct RedditProvider {
    mode: Mode,
    limit: usize,
}

impl RedditProvider {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
            limit: usize::MAX,
        }
    }

    pub fn from_url(url: &str, limit: usize, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
            limit,
        }
    }

    fn parse_items_from_str(&self, s: &str) -> Result<Vec<WorldEvent>> {
        let t0 = std::time::Instant::now();
        let listing: Listing = serde_json::from_str(s).context("parsing reddit listing json")?;

        let mut out = Vec::with_capacity(listing.data.children.len());
        for Child { data: post } in listing.data.children {
            if post.stickied {
                continue;
            }
            if out.len() >= self.limit {
                break;
            }

            let domain = post.domain.filter(|d| !d.trim().is_empty());
            let summary = if post.selftext.trim().is_empty() {
                match &domain {
                    Some(d) => format!("Shared from {d}"),
                    None => String::new(),
                }
            } else {
                post.selftext
            };

            let mut tags = Vec::new();
            if let Some(flair) = post.link_flair_text.filter(|f| !f.trim().is_empty()) {
                tags.push(flair);
            }
            if let Some(d) = domain {
                tags.push(d);
            }

            let url = match post.url {
                Some(u) if u.starts_with("http://") || u.starts_with("https://") => u,
                _ => format!("https://www.reddit.com{}", post.permalink),
            };

            out.push(WorldEvent {
                id: format!("reddit-{}", post.id),
                title: post.title,
                summary,
                source_name: EventSource::Reddit.display_name().to_string(),
                source: EventSource::Reddit,
                tags,
                published_at: unix_to_rfc3339(post.created_utc),
                url,
            });
        }

        histogram!("events_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("events_fetch_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl EventProvider for RedditProvider {
    async fn fetch_latest(&self) -> Result<Vec<WorldEvent>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),
            Mode::Http { url, client } => {
                let body = fetch_body(client, url, "reddit").await?;
                self.parse_items_from_str(&body)
            }
        }
    }

    fn source(&self) -> EventSource {
        EventSource::Reddit
    }
}
