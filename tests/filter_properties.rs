// tests/filter_properties.rs
//
// Filter engine and status summarizer properties over a mixed event list.

use proptest::prelude::*;
use world_event_agent::events::types::{EventSource, SourceFilter, WorldEvent};
use world_event_agent::feed::{build_status, filter_events, format_relative, format_relative_at, parse_published_at};

fn event(id: &str, source: EventSource, title: &str, summary: &str, tags: &[&str], ts: &str) -> WorldEvent {
    WorldEvent {
        id: id.into(),
        title: title.into(),
        summary: summary.into(),
        source_name: source.display_name().into(),
        source,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        published_at: ts.into(),
        url: format!("https://example.org/{id}"),
    }
}

fn sample() -> Vec<WorldEvent> {
    vec![
        event("1", EventSource::Reddit, "Quake strikes coast", "Tsunami alert lifted", &["Japan"], "2024-01-01T00:00:00Z"),
        event("2", EventSource::Wikimedia, "Election results", "Flood of votes counted", &["Politics"], "2024-06-01T00:00:00Z"),
        event("3", EventSource::Aljazeera, "Aid convoy", "Relief arrives", &["Flood relief", "Aid"], "2023-01-01T00:00:00Z"),
        event("4", EventSource::Reddit, "Markets", "Stocks rally", &[], "garbage"),
        event("5", EventSource::Aljazeera, "FLOODWATERS recede", "", &[], ""),
    ]
}

fn ids(v: &[&WorldEvent]) -> Vec<String> {
    v.iter().map(|e| e.id.clone()).collect()
}

#[test]
fn source_only_filter_keeps_only_that_source() {
    let list = sample();
    for s in EventSource::ALL {
        let out = filter_events(&list, "", SourceFilter::Only(s));
        assert!(out.iter().all(|e| e.source == s));
        assert_eq!(out.len(), list.iter().filter(|e| e.source == s).count());
    }
}

#[test]
fn empty_query_and_all_is_identity() {
    let list = sample();
    let out: Vec<WorldEvent> = filter_events(&list, "   ", SourceFilter::All)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(out, list);
}

#[test]
fn query_result_is_ordered_subsequence_of_matches() {
    let list = sample();
    let out = filter_events(&list, "Flood", SourceFilter::All);
    // summary of 2, tag of 3, title of 5 (case-insensitive)
    assert_eq!(ids(&out), vec!["2", "3", "5"]);
}

#[test]
fn filter_is_idempotent() {
    let list = sample();
    let a = ids(&filter_events(&list, "aid", SourceFilter::Only(EventSource::Aljazeera)));
    let b = ids(&filter_events(&list, "aid", SourceFilter::Only(EventSource::Aljazeera)));
    assert_eq!(a, b);
    assert_eq!(a, vec!["3"]);
}

#[test]
fn flood_under_reddit_is_empty() {
    let list = vec![event("w", EventSource::Wikimedia, "Flood warning", "", &[], "2024-06-01T00:00:00Z")];
    assert!(filter_events(&list, "flood", SourceFilter::Only(EventSource::Reddit)).is_empty());
}

#[test]
fn summarize_selects_maximum_and_ignores_malformed() {
    assert_eq!(
        build_status(&sample()).as_deref(),
        Some("Latest update: 6/1/2024, 12:00:00 AM UTC")
    );
    assert_eq!(build_status(&[]), None);
}

#[test]
fn relative_format_never_panics_and_now_is_just_now() {
    for s in ["", "not-a-date", "9999-12-31T23:59:59Z", "0001-01-01T00:00:00Z", "\u{0}"] {
        let _ = format_relative(s);
    }
    let now = chrono::Utc::now().to_rfc3339();
    assert_eq!(format_relative(&now), "Just now");
}

// Small alphabet so generated queries actually hit titles, summaries and tags.
fn text() -> impl Strategy<Value = String> {
    "[a-cA-C ]{0,8}"
}

fn source() -> impl Strategy<Value = EventSource> {
    prop_oneof![
        Just(EventSource::Reddit),
        Just(EventSource::Wikimedia),
        Just(EventSource::Aljazeera),
    ]
}

fn selector() -> impl Strategy<Value = SourceFilter> {
    prop_oneof![Just(SourceFilter::All), source().prop_map(SourceFilter::Only)]
}

fn arb_event() -> impl Strategy<Value = WorldEvent> {
    (
        "[0-9]{1,4}",
        source(),
        text(),
        text(),
        prop::collection::vec(text(), 0..3),
    )
        .prop_map(|(id, source, title, summary, tags)| WorldEvent {
            url: format!("https://example.org/{id}"),
            id,
            title,
            summary,
            source_name: source.display_name().into(),
            source,
            tags,
            published_at: "2024-06-01T00:00:00Z".into(),
        })
}

fn arb_events() -> impl Strategy<Value = Vec<WorldEvent>> {
    prop::collection::vec(arb_event(), 0..12)
}

fn expected(list: &[WorldEvent], query: &str, sel: SourceFilter) -> Vec<WorldEvent> {
    let q = query.trim().to_lowercase();
    list.iter()
        .filter(|e| match sel {
            SourceFilter::All => true,
            SourceFilter::Only(s) => e.source == s,
        })
        .filter(|e| {
            q.is_empty()
                || e.title.to_lowercase().contains(&q)
                || e.summary.to_lowercase().contains(&q)
                || e.tags.iter().any(|t| t.to_lowercase().contains(&q))
        })
        .cloned()
        .collect()
}

fn owned(v: Vec<&WorldEvent>) -> Vec<WorldEvent> {
    v.into_iter().cloned().collect()
}

proptest! {
    #[test]
    fn prop_source_only_keeps_that_source(list in arb_events(), s in source()) {
        let out = filter_events(&list, "", SourceFilter::Only(s));
        prop_assert!(out.iter().all(|e| e.source == s));
        prop_assert_eq!(out.len(), list.iter().filter(|e| e.source == s).count());
    }

    #[test]
    fn prop_blank_query_with_all_is_identity(list in arb_events(), blank in "[ ]{0,3}") {
        prop_assert_eq!(owned(filter_events(&list, &blank, SourceFilter::All)), list);
    }

    #[test]
    fn prop_result_is_ordered_subsequence(list in arb_events(), q in text(), sel in selector()) {
        prop_assert_eq!(owned(filter_events(&list, &q, sel)), expected(&list, &q, sel));
    }

    #[test]
    fn prop_filter_is_idempotent(list in arb_events(), q in text(), sel in selector()) {
        let once = owned(filter_events(&list, &q, sel));
        let twice = owned(filter_events(&once, &q, sel));
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_relative_format_is_total(s in any::<String>()) {
        let now = parse_published_at("2024-06-01T12:00:00Z").unwrap();
        let label = format_relative_at(&s, now);
        prop_assert!(!label.is_empty());
    }
}
