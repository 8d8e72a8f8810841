//! Timestamp parsing and "N min ago" labels for event cards.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an ISO-like `publishedAt` value. `None` means malformed.
///
/// Accepted, in order: RFC 3339, RFC 2822, naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// and `YYYY-MM-DD HH:MM:SS` (both taken as UTC), and a bare `YYYY-MM-DD`.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Relative label against the current clock.
pub fn format_relative(published_at: &str) -> String {
    format_relative_at(published_at, Utc::now())
}

/// Relative label against a fixed `now`. Never panics.
pub fn format_relative_at(published_at: &str, now: DateTime<Utc>) -> String {
    let Some(input) = parse_published_at(published_at) else {
        return "Recently".to_string();
    };

    // Floor division so that future timestamps land on "Just now".
    let minutes = (now - input).num_milliseconds().div_euclid(60_000);
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hr{} ago", plural(hours));
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days} day{} ago", plural(days));
    }
    input.format("%b %-d, %Y").to_string()
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
