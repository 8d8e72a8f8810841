// src/events/mod.rs
pub mod providers;
pub mod types;

use crate::config::AppConfig;
use crate::events::providers::{
    aljazeera_rss::AljazeeraRssProvider, reddit::RedditProvider, wikimedia::WikimediaProvider,
};
use crate::events::types::{EventFeed, EventProvider, WorldEvent};
use crate::feed::parse_published_at;
use anyhow::{anyhow, Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::time::Duration;

const SUMMARY_MAX_CHARS: usize = 600;
const TITLE_MAX_CHARS: usize = 300;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("events_fetch_total", "Events parsed from providers.");
        describe_counter!("events_kept_total", "Events kept after normalization + dedup.");
        describe_counter!(
            "events_dropped_total",
            "Events dropped for an empty title or url."
        );
        describe_counter!("events_dedup_total", "Events removed as duplicates.");
        describe_counter!(
            "events_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("events_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!("events_last_fetch_ts", "Unix ts of the last aggregation run.");
    });
}

/// Normalize display text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    normalize_capped(s, SUMMARY_MAX_CHARS)
}

fn normalize_capped(s: &str, cap: usize) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > cap {
        out = out.chars().take(cap).collect::<String>().trim_end().to_string();
        out.push('…');
    }
    out
}

/// Normalize, drop incomplete records, de-duplicate (by id, then title) and sort newest first.
/// Returns (kept, dropped_count, dedup_count).
pub fn normalize_dedup_sort(
    raw: Vec<WorldEvent>,
    max_events: usize,
) -> (Vec<WorldEvent>, usize, usize) {
    let mut dropped = 0usize;
    let mut dedup = 0usize;
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(raw.len());

    for mut ev in raw {
        ev.title = normalize_capped(&ev.title, TITLE_MAX_CHARS);
        ev.summary = normalize_text(&ev.summary);
        ev.tags = ev
            .tags
            .iter()
            .map(|t| normalize_capped(t, 80))
            .filter(|t| !t.is_empty())
            .collect();
        ev.url = ev.url.trim().to_string();

        if ev.title.is_empty() || ev.url.is_empty() {
            dropped += 1;
            continue;
        }
        if !seen_ids.insert(ev.id.clone()) || !seen_titles.insert(ev.title.to_lowercase()) {
            dedup += 1;
            continue;
        }
        keep.push(ev);
    }

    // Stable: equal timestamps keep provider order, malformed ones sink to the end.
    keep.sort_by_cached_key(|ev| {
        std::cmp::Reverse(parse_published_at(&ev.published_at).map(|dt| dt.timestamp_millis()))
    });
    keep.truncate(max_events);

    (keep, dropped, dedup)
}

/// Run every provider once and merge the results.
/// Fails only when at least one provider exists and all of them failed.
pub async fn run_once(providers: &[Box<dyn EventProvider>], max_events: usize) -> Result<Vec<WorldEvent>> {
    ensure_metrics_described();

    let mut raw = Vec::new();
    let mut failures = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(target: "events", provider = p.source().as_str(), count = v.len(), "provider ok");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(target: "events", error = ?e, provider = p.source().as_str(), "provider error");
                counter!("events_provider_errors_total").increment(1);
                failures.push(format!("{}: {e}", p.source()));
            }
        }
    }

    if !providers.is_empty() && failures.len() == providers.len() {
        return Err(anyhow!(
            "Unable to reach any event source ({})",
            failures.join("; ")
        ));
    }

    let (kept, dropped, dedup) = normalize_dedup_sort(raw, max_events);

    counter!("events_kept_total").increment(kept.len() as u64);
    counter!("events_dropped_total").increment(dropped as u64);
    counter!("events_dedup_total").increment(dedup as u64);
    gauge!("events_last_fetch_ts").set(chrono::Utc::now().timestamp() as f64);

    tracing::info!(
        target: "events",
        kept = kept.len(),
        dropped,
        dedup,
        failed_providers = failures.len(),
        "aggregation run"
    );

    Ok(kept)
}

/// Aggregator over the configured providers; the production `EventFeed`.
pub struct Aggregator {
    providers: Vec<Box<dyn EventProvider>>,
    max_events: usize,
}

impl Aggregator {
    pub fn new(providers: Vec<Box<dyn EventProvider>>, max_events: usize) -> Self {
        Self {
            providers,
            max_events,
        }
    }

    /// Build HTTP providers for every enabled source in the config.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.fetch.user_agent.clone())
            .timeout(Duration::from_secs(cfg.fetch.timeout_secs))
            .build()
            .context("building upstream http client")?;

        let mut providers: Vec<Box<dyn EventProvider>> = Vec::new();
        let s = &cfg.sources;
        if s.reddit.enabled {
            providers.push(Box::new(RedditProvider::from_url(
                &s.reddit.url,
                s.reddit.limit,
                client.clone(),
            )));
        }
        if s.wikimedia.enabled {
            providers.push(Box::new(WikimediaProvider::from_url(
                &s.wikimedia.url,
                s.wikimedia.limit,
                client.clone(),
            )));
        }
        if s.aljazeera.enabled {
            providers.push(Box::new(AljazeeraRssProvider::from_url(
                &s.aljazeera.url,
                s.aljazeera.limit,
                client,
            )));
        }

        let aggregator = Self::new(providers, cfg.fetch.max_events);
        tracing::info!(target: "events", providers = aggregator.provider_count(), "aggregator ready");
        Ok(aggregator)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

#[async_trait::async_trait]
impl EventFeed for Aggregator {
    async fn fetch_world_events(&self) -> Result<Vec<WorldEvent>> {
        run_once(&self.providers, self.max_events).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::EventSource;

    fn ev(id: &str, title: &str, ts: &str) -> WorldEvent {
        WorldEvent {
            id: id.into(),
            title: title.into(),
            summary: "s".into(),
            source_name: "Al Jazeera".into(),
            source: EventSource::Aljazeera,
            tags: vec![],
            published_at: ts.into(),
            url: format!("https://example.org/{id}"),
        }
    }

    #[test]
    fn normalize_text_strips_tags_and_collapses_ws() {
        let out = normalize_text("  <b>Quake</b>&nbsp;&nbsp;hits\n  “coast”  ");
        assert_eq!(out, "Quake hits \"coast\"");
    }

    #[test]
    fn normalize_text_caps_long_input() {
        let long = "a".repeat(SUMMARY_MAX_CHARS + 50);
        let out = normalize_text(&long);
        assert_eq!(out.chars().count(), SUMMARY_MAX_CHARS + 1);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn sorts_newest_first_with_malformed_last() {
        let raw = vec![
            ev("a", "A", "not-a-date"),
            ev("b", "B", "2024-01-01T00:00:00Z"),
            ev("c", "C", "2024-06-01T00:00:00Z"),
        ];
        let (kept, _, _) = normalize_dedup_sort(raw, 10);
        let ids: Vec<_> = kept.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn from_config_builds_only_enabled_sources() {
        let mut cfg = AppConfig::default();
        assert_eq!(Aggregator::from_config(&cfg).unwrap().provider_count(), 3);

        cfg.sources.reddit.enabled = false;
        cfg.sources.aljazeera.enabled = false;
        assert_eq!(Aggregator::from_config(&cfg).unwrap().provider_count(), 1);
    }

    #[test]
    fn dedups_by_id_and_title_and_drops_empty() {
        let raw = vec![
            ev("a", "Same title", "2024-01-01T00:00:00Z"),
            ev("a", "Other", "2024-01-01T00:00:00Z"),
            ev("b", "same TITLE", "2024-01-01T00:00:00Z"),
            ev("c", "   ", "2024-01-01T00:00:00Z"),
        ];
        let (kept, dropped, dedup) = normalize_dedup_sort(raw, 10);
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 1);
        assert_eq!(dedup, 2);
    }
}
