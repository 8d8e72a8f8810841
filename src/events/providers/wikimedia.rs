// src/events/providers/wikimedia.rs
//! Wikimedia featured-content feed (`/feed/v1/wikipedia/en/featured/YYYY/MM/DD`).
//!
//! Two kinds of items are taken from a day's feed: the featured article (`tfa`)
//! and the "In the news" stories (`news`). News stories carry no timestamp of
//! their own, so they are dated at midnight UTC of the feed day.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;

use super::fetch_body;
use crate::events::normalize_text;
use crate::events::types::{EventProvider, EventSource, WorldEvent};

#[derive(Debug, Deserialize)]
struct FeaturedFeed {
    tfa: Option<Article>,
    #[serde(default)]
    news: Vec<NewsStory>,
}

#[derive(Debug, Deserialize)]
struct NewsStory {
    story: String,
    #[serde(default)]
    links: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    titles: Option<Titles>,
    normalizedtitle: Option<String>,
    description: Option<String>,
    extract: Option<String>,
    timestamp: Option<String>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct Titles {
    normalized: String,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrls>,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: String,
}

impl Article {
    fn title(&self) -> Option<&str> {
        self.titles
            .as_ref()
            .map(|t| t.normalized.as_str())
            .or(self.normalizedtitle.as_deref())
    }

    fn page_url(&self) -> Option<&str> {
        self.content_urls
            .as_ref()
            .and_then(|c| c.desktop.as_ref())
            .map(|d| d.page.as_str())
    }
}

pub struct WikimediaProvider {
    mode: WikiMode,
    limit: usize,
}

enum WikiMode {
    Fixture { body: String, date: NaiveDate },
    Http { base_url: String, client: reqwest::Client },
}

impl WikimediaProvider {
    /// Parse a saved feed; `date` is the day the feed was published for.
    pub fn from_fixture(s: &str, date: NaiveDate) -> Self {
        Self {
            mode: WikiMode::Fixture {
                body: s.to_string(),
                date,
            },
            limit: usize::MAX,
        }
    }

    /// `base_url` without the trailing `/YYYY/MM/DD`; today's date (UTC) is appended per fetch.
    pub fn from_url(base_url: &str, limit: usize, client: reqwest::Client) -> Self {
        Self {
            mode: WikiMode::Http {
                base_url: base_url.trim_end_matches('/').to_string(),
                client,
            },
            limit,
        }
    }

    fn parse_items_from_str(&self, s: &str, date: NaiveDate) -> Result<Vec<WorldEvent>> {
        let t0 = std::time::Instant::now();
        let feed: FeaturedFeed = serde_json::from_str(s).context("parsing wikimedia featured json")?;
        let day = date.format("%Y-%m-%d").to_string();
        let midnight = format!("{day}T00:00:00Z");

        let mut out = Vec::new();

        if let Some(tfa) = feed.tfa {
            if let (Some(title), Some(url)) = (tfa.title(), tfa.page_url()) {
                let mut tags = vec!["Featured article".to_string()];
                if let Some(d) = tfa.description.as_deref().filter(|d| !d.trim().is_empty()) {
                    tags.push(d.to_string());
                }
                out.push(WorldEvent {
                    id: format!("wikimedia-tfa-{day}"),
                    title: title.to_string(),
                    summary: tfa.extract.clone().unwrap_or_default(),
                    source_name: EventSource::Wikimedia.display_name().to_string(),
                    source: EventSource::Wikimedia,
                    tags,
                    published_at: tfa.timestamp.clone().unwrap_or_else(|| midnight.clone()),
                    url: url.to_string(),
                });
            }
        }

        for (idx, story) in feed.news.iter().enumerate() {
            if out.len() >= self.limit {
                break;
            }
            let Some(first) = story.links.first() else {
                continue;
            };
            let Some(url) = first.page_url() else {
                continue;
            };
            let title = normalize_text(&story.story);
            let summary = first
                .extract
                .clone()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| title.clone());
            let tags = story
                .links
                .iter()
                .filter_map(Article::title)
                .take(3)
                .map(str::to_string)
                .collect();

            out.push(WorldEvent {
                id: format!("wikimedia-news-{day}-{idx}"),
                title,
                summary,
                source_name: EventSource::Wikimedia.display_name().to_string(),
                source: EventSource::Wikimedia,
                tags,
                published_at: midnight.clone(),
                url: url.to_string(),
            });
        }

        out.truncate(self.limit);

        histogram!("events_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("events_fetch_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl EventProvider for WikimediaProvider {
    async fn fetch_latest(&self) -> Result<Vec<WorldEvent>> {
        match &self.mode {
            WikiMode::Fixture { body, date } => self.parse_items_from_str(body, *date),
            WikiMode::Http { base_url, client } => {
                let date = Utc::now().date_naive();
                let url = format!("{base_url}/{}", date.format("%Y/%m/%d"));
                let body = fetch_body(client, &url, "wikimedia").await?;
                self.parse_items_from_str(&body, date)
            }
        }
    }

    fn source(&self) -> EventSource {
        EventSource::Wikimedia
    }
}
