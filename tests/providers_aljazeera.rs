// tests/providers_aljazeera.rs
use world_event_agent::events::providers::aljazeera_rss::AljazeeraRssProvider;
use world_event_agent::events::types::{EventProvider, EventSource};
use world_event_agent::feed::parse_published_at;
use std::fs;

#[tokio::test]
async fn parses_aljazeera_fixture() {
    let xml = fs::read_to_string("tests/fixtures/aljazeera_rss.xml").expect("fixture");
    let p = AljazeeraRssProvider::from_fixture(&xml);
    let evs = p.fetch_latest().await.expect("ok");

    // the link-less item is skipped
    assert_eq!(evs.len(), 2);
    assert!(evs.iter().all(|e| e.source == EventSource::Aljazeera));
    assert!(evs.iter().all(|e| e.url.starts_with("https://www.aljazeera.com/")));

    let famine = &evs[0];
    assert_eq!(famine.id, "aljazeera-un-warns-of-famine-risk");
    assert_eq!(famine.published_at, "2024-06-01T09:30:00Z");
    assert_eq!(
        famine.tags,
        vec!["News".to_string(), "Humanitarian crises".to_string()]
    );
    assert_eq!(
        famine.summary,
        "Aid agencies say deliveries have fallen sharply this week."
    );

    // unparsable pubDate is kept verbatim for consumers to degrade on
    let markets = &evs[1];
    assert_eq!(markets.id, "aljazeera-markets-rally");
    assert_eq!(markets.published_at, "not a real date");
    assert!(parse_published_at(&markets.published_at).is_none());
}
