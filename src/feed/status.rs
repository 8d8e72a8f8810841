//! Freshness label ("Latest update: ...") derived from an event list.

use crate::events::types::WorldEvent;
use crate::feed::parse_published_at;

/// Shown when there is no label (empty list).
pub const STATUS_PLACEHOLDER: &str = "Waiting for updates...";

/// Pick the newest record. Left fold seeded with the first element; a later
/// record wins only when strictly newer, so ties keep the earliest in list order.
/// Malformed timestamps rank as the earliest possible instant.
pub fn newest_event(events: &[WorldEvent]) -> Option<&WorldEvent> {
    let (first, rest) = events.split_first()?;
    let newest = rest.iter().fold(
        (first, parse_published_at(&first.published_at)),
        |(latest, latest_ts), current| {
            let current_ts = parse_published_at(&current.published_at);
            // `None < Some(_)` for Option ordering.
            if current_ts > latest_ts {
                (current, current_ts)
            } else {
                (latest, latest_ts)
            }
        },
    );
    Some(newest.0)
}

/// `None` for an empty list, else `Latest update: <M/D/YYYY, h:mm:ss AM> UTC`.
pub fn build_status(events: &[WorldEvent]) -> Option<String> {
    let newest = newest_event(events)?;
    let label = match parse_published_at(&newest.published_at) {
        Some(dt) => format!("{} UTC", dt.format("%-m/%-d/%Y, %-I:%M:%S %p")),
        None => "Recently".to_string(),
    };
    Some(format!("Latest update: {label}"))
}
