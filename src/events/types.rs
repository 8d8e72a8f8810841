// src/events/types.rs
use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Upstream origin of an event. `all` is a filter sentinel, never a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Reddit,
    Wikimedia,
    Aljazeera,
}

impl EventSource {
    pub const ALL: [EventSource; 3] = [Self::Reddit, Self::Wikimedia, Self::Aljazeera];

    /// Wire tag, e.g. `"reddit"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::Wikimedia => "wikimedia",
            Self::Aljazeera => "aljazeera",
        }
    }

    /// Human-readable label shown on cards and in the source picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Reddit => "Reddit r/worldnews",
            Self::Wikimedia => "Wikimedia Featured",
            Self::Aljazeera => "Al Jazeera",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized world event, as served on `/api/events`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorldEvent {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source_name: String, // e.g. "Reddit r/worldnews"
    pub source: EventSource,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_at: String, // ISO-like, may be malformed
    pub url: String,
}

/// Source selector: `All` means "no filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Only(EventSource),
}

impl SourceFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(s) => s.as_str(),
        }
    }

    pub fn accepts(&self, source: EventSource) -> bool {
        match self {
            Self::All => true,
            Self::Only(s) => *s == source,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "reddit" => Ok(Self::Only(EventSource::Reddit)),
            "wikimedia" => Ok(Self::Only(EventSource::Wikimedia)),
            "aljazeera" => Ok(Self::Only(EventSource::Aljazeera)),
            other => Err(anyhow!("unknown source selector: {other}")),
        }
    }
}

impl From<EventSource> for SourceFilter {
    fn from(s: EventSource) -> Self {
        Self::Only(s)
    }
}

/// One upstream adapter (Reddit, Wikimedia, Al Jazeera).
#[async_trait::async_trait]
pub trait EventProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<WorldEvent>>;
    fn source(&self) -> EventSource;
}

/// The data-gathering collaborator behind both `/api/events` and the initial page load.
#[async_trait::async_trait]
pub trait EventFeed: Send + Sync {
    async fn fetch_world_events(&self) -> Result<Vec<WorldEvent>>;
}
