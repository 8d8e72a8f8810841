//! # Feed Controller
//!
//! Owns the authoritative event list, the filter inputs and the freshness
//! label, and orchestrates manual refreshes against a [`FeedTransport`].
//!
//! - `Idle` → `Refreshing` on [`FeedController::refresh`].
//! - `Refreshing` → `Idle` on success: list replaced wholesale, label recomputed.
//! - `Refreshing` → `Error` on failure: list and label kept, message stored.
//! - `Error` → `Refreshing` on the next attempt; the error is cleared first.
//!
//! Single-flight: a refresh issued while another is in flight returns
//! [`RefreshOutcome::Skipped`] without touching the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::events::types::{SourceFilter, WorldEvent};
use crate::feed::filter::filter_events;
use crate::feed::status::{build_status, STATUS_PLACEHOLDER};
use crate::feed::transport::FeedTransport;

const UNKNOWN_ERROR: &str = "Unknown error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Refreshing,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New list installed; carries its length.
    Refreshed(usize),
    /// Transport failed; previous list retained.
    Failed(String),
    /// Another refresh was already in flight.
    Skipped,
}

#[derive(Debug, Default)]
struct State {
    events: Vec<WorldEvent>,
    query: String,
    source: SourceFilter,
    status: Option<String>,
    error: Option<String>,
}

/// Derived, render-ready snapshot.
#[derive(Debug, Clone)]
pub struct FeedView {
    pub events: Vec<WorldEvent>,
    pub total: usize,
    pub status: String,
    pub error: Option<String>,
    pub refreshing: bool,
    pub query: String,
    pub source: SourceFilter,
}

impl FeedView {
    /// "No results" state: nothing matches the current filters.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub struct FeedController<T: FeedTransport> {
    transport: T,
    state: Mutex<State>,
    in_flight: AtomicBool,
}

/// Releases the in-flight latch even if the refresh future is dropped.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T: FeedTransport> FeedController<T> {
    /// Seed with whatever the initial load produced (possibly empty).
    pub fn new(transport: T, initial_events: Vec<WorldEvent>) -> Self {
        let status = build_status(&initial_events);
        Self {
            transport,
            state: Mutex::new(State {
                events: initial_events,
                status,
                ..State::default()
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.lock().query = query.into();
    }

    pub fn set_source(&self, source: SourceFilter) {
        self.lock().source = source;
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> FeedPhase {
        if self.is_refreshing() {
            FeedPhase::Refreshing
        } else if self.lock().error.is_some() {
            FeedPhase::Error
        } else {
            FeedPhase::Idle
        }
    }

    pub fn events(&self) -> Vec<WorldEvent> {
        self.lock().events.clone()
    }

    pub fn status(&self) -> Option<String> {
        self.lock().status.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Re-fetch and replace the list. At most one refresh runs at a time.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(target: "feed", "refresh already in flight; skipped");
            return RefreshOutcome::Skipped;
        }
        let _guard = FlightGuard(&self.in_flight);

        self.lock().error = None;

        // Lock is not held across the await.
        let result = self.transport.fetch_events().await;

        let mut state = self.lock();
        match result {
            Ok(events) => {
                let n = events.len();
                state.status = build_status(&events);
                state.events = events;
                tracing::info!(target: "feed", events = n, "feed refreshed");
                RefreshOutcome::Refreshed(n)
            }
            Err(e) => {
                let msg = e.to_string();
                let msg = if msg.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    msg
                };
                tracing::warn!(target: "feed", error = %msg, "feed refresh failed");
                state.error = Some(msg.clone());
                RefreshOutcome::Failed(msg)
            }
        }
    }

    /// Filtered events plus status, error and refreshing flag.
    pub fn view(&self) -> FeedView {
        let refreshing = self.is_refreshing();
        let state = self.lock();
        let events = filter_events(&state.events, &state.query, state.source)
            .into_iter()
            .cloned()
            .collect();
        FeedView {
            events,
            total: state.events.len(),
            status: state
                .status
                .clone()
                .unwrap_or_else(|| STATUS_PLACEHOLDER.to_string()),
            error: state.error.clone(),
            refreshing,
            query: state.query.clone(),
            source: state.source,
        }
    }
}
