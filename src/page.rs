//! Server-rendered feed page: toolbar, status strip, and event cards.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write as _;

use crate::events::types::{EventSource, SourceFilter, WorldEvent};
use crate::feed::{build_status, filter_events, format_relative_at, STATUS_PLACEHOLDER};

const EMPTY_STATE: &str =
    "Nothing matches your filters right now. Try adjusting the source or search query.";

pub struct PageModel<'a> {
    pub events: &'a [WorldEvent],
    pub query: &'a str,
    pub source: SourceFilter,
    pub error: Option<&'a str>,
}

pub fn render_page(model: &PageModel<'_>, now: DateTime<Utc>) -> String {
    let filtered = filter_events(model.events, model.query, model.source);
    let status = build_status(model.events).unwrap_or_else(|| STATUS_PLACEHOLDER.to_string());

    let mut out = String::with_capacity(4096 + filtered.len() * 512);
    out.push_str(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>World Event Agent</title>\n</head>\n<body>\n<div class=\"app-shell\">\n",
    );
    out.push_str(
        "<header class=\"hero\">\n<h1>World Event Agent</h1>\n<p>A constantly updating \
         intelligence layer that distills key developments from multiple global sources. \
         Track geopolitical shifts, humanitarian updates, and live headlines in a single, \
         unified feed.</p>\n</header>\n",
    );

    render_toolbar(&mut out, model);

    let _ = writeln!(
        out,
        "<div class=\"status-strip\"><span>🛰️</span><span>{}</span></div>",
        text(&status)
    );

    if let Some(err) = model.error {
        let _ = writeln!(out, "<div class=\"error-state\">{}</div>", text(err));
    }

    if filtered.is_empty() {
        let _ = writeln!(out, "<div class=\"empty-state\">{EMPTY_STATE}</div>");
    } else {
        out.push_str("<div class=\"events-grid\">\n");
        for ev in filtered {
            render_card(&mut out, ev, now);
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn render_toolbar(out: &mut String, model: &PageModel<'_>) {
    let _ = write!(
        out,
        "<form class=\"toolbar\" method=\"get\" action=\"/\">\n\
         <input name=\"q\" aria-label=\"Search world events\" \
         placeholder=\"Search events, locations, or topics...\" value=\"{}\">\n\
         <select name=\"source\" aria-label=\"Filter by source\">\n",
        attr(model.query)
    );
    option(out, "all", "All sources", model.source == SourceFilter::All);
    for s in EventSource::ALL {
        option(out, s.as_str(), s.display_name(), model.source == SourceFilter::Only(s));
    }
    out.push_str(
        "</select>\n<button type=\"submit\" class=\"refresh-button\">Refresh Feed</button>\n</form>\n",
    );
}

fn option(out: &mut String, value: &str, label: &str, selected: bool) {
    let sel = if selected { " selected" } else { "" };
    let _ = writeln!(out, "<option value=\"{value}\"{sel}>{}</option>", text(label));
}

fn render_card(out: &mut String, ev: &WorldEvent, now: DateTime<Utc>) {
    out.push_str("<article class=\"event-card\">\n");
    let _ = writeln!(
        out,
        "<div class=\"event-card__source\"><span aria-hidden=\"true\">🌐</span><span>{}</span></div>",
        text(&ev.source_name)
    );
    let _ = writeln!(out, "<h3 class=\"event-card__title\">{}</h3>", text(&ev.title));
    let _ = writeln!(out, "<p class=\"event-card__summary\">{}</p>", text(&ev.summary));
    out.push_str("<div class=\"event-card__tags\">");
    for tag in &ev.tags {
        let _ = write!(out, "<span class=\"tag\">{}</span>", text(tag));
    }
    out.push_str("</div>\n");
    let _ = writeln!(
        out,
        "<footer class=\"event-card__footer\"><time datetime=\"{}\">{}</time>\
         <a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">Read source ↗</a></footer>",
        attr(&ev.published_at),
        text(&format_relative_at(&ev.published_at, now)),
        attr(&ev.url)
    );
    out.push_str("</article>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_published_at;

    fn ev(id: &str, source: EventSource, title: &str) -> WorldEvent {
        WorldEvent {
            id: id.into(),
            title: title.into(),
            summary: "summary".into(),
            source_name: source.display_name().into(),
            source,
            tags: vec!["Politics".into()],
            published_at: "2024-06-01T10:00:00Z".into(),
            url: "https://example.org/a?b=1&c=2".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        parse_published_at("2024-06-01T12:00:00Z").unwrap()
    }

    #[test]
    fn renders_cards_status_and_escapes() {
        let events = vec![ev("1", EventSource::Reddit, "<script>alert(\"x\")</script>")];
        let html = render_page(
            &PageModel {
                events: &events,
                query: "\"x",
                source: SourceFilter::All,
                error: None,
            },
            now(),
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Latest update: 6/1/2024, 10:00:00 AM UTC"));
        assert!(html.contains("2 hrs ago"));
        assert!(html.contains("https://example.org/a?b=1&amp;c=2"));
        assert!(html.contains("value=\"&quot;x\""));
    }

    #[test]
    fn empty_filter_result_shows_no_results_and_keeps_selection() {
        let events = vec![ev("1", EventSource::Wikimedia, "Flood warning")];
        let html = render_page(
            &PageModel {
                events: &events,
                query: "flood",
                source: SourceFilter::Only(EventSource::Reddit),
                error: Some("Unable to reach any event source"),
            },
            now(),
        );
        assert!(html.contains("empty-state"));
        assert!(!html.contains("event-card__title"));
        assert!(html.contains("<option value=\"reddit\" selected>"));
        assert!(html.contains("error-state"));
    }

    #[test]
    fn empty_list_shows_placeholder_status() {
        let html = render_page(
            &PageModel {
                events: &[],
                query: "",
                source: SourceFilter::All,
                error: None,
            },
            now(),
        );
        assert!(html.contains(STATUS_PLACEHOLDER));
    }
}
