// src/events/providers/aljazeera_rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

use super::{fetch_body, Mode};
use crate::events::types::{EventProvider, EventSource, WorldEvent};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "category", default)]
    category: Vec<String>,
}

/// RFC 2822 → RFC 3339 (UTC). Unparsable input is kept verbatim for consumers to degrade on.
fn rfc2822_to_rfc3339(ts: &str) -> String {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .and_then(|dt| dt.to_offset(UtcOffset::UTC).format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.to_string())
}

/// `https://www.aljazeera.com/news/2024/6/1/some-slug` → `some-slug`
fn slug_from_link(link: &str) -> &str {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(link)
}

pub struct AljazeeraRssProvider {
    mode: Mode,
    limit: usize,
}

impl AljazeeraRssProvider {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            mode: Mode::Fixture(content.to_string()),
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
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing al jazeera rss xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item.into_iter().take(self.limit) {
            let Some(link) = it.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
            else {
                continue;
            };
            out.push(WorldEvent {
                id: format!("aljazeera-{}", slug_from_link(&link)),
                title: it.title.unwrap_or_default(),
                summary: it.description.unwrap_or_default(),
                source_name: EventSource::Aljazeera.display_name().to_string(),
                source: EventSource::Aljazeera,
                tags: it.category,
                published_at: it
                    .pub_date
                    .as_deref()
                    .map(rfc2822_to_rfc3339)
                    .unwrap_or_default(),
                url: link,
            });
        }

        histogram!("events_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("events_fetch_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl EventProvider for AljazeeraRssProvider {
    async fn fetch_latest(&self) -> Result<Vec<WorldEvent>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),
            Mode::Http { url, client } => {
                let body = fetch_body(client, url, "aljazeera").await?;
                self.parse_items_from_str(&body)
            }
        }
    }

    fn source(&self) -> EventSource {
        EventSource::Aljazeera
    }
}

// XML only knows the five predefined entities; feeds sometimes leak HTML ones.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
