//! Search + source filtering over an already-fetched event list.

use crate::events::types::{SourceFilter, WorldEvent};

/// Stable filter: keeps the events matching both the source selector and the
/// free-text query, in their original order.
///
/// The query is trimmed and compared case-insensitively as a substring of the
/// title, the summary, or any tag. An empty query matches everything.
pub fn filter_events<'a>(
    events: &'a [WorldEvent],
    query: &str,
    source: SourceFilter,
) -> Vec<&'a WorldEvent> {
    let needle = query.trim().to_lowercase();
    events
        .iter()
        .filter(|ev| matches_event(ev, &needle, source))
        .collect()
}

/// `needle` must already be trimmed and lower-cased.
pub fn matches_event(event: &WorldEvent, needle: &str, source: SourceFilter) -> bool {
    if !source.accepts(event.source) {
        return false;
    }
    needle.is_empty()
        || event.title.to_lowercase().contains(needle)
        || event.summary.to_lowercase().contains(needle)
        || event
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}
