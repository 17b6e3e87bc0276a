//! Feed provider abstraction
//!
//! Defines the FeedFetcher trait the orchestrator pulls scoreboards and
//! event summaries through, plus thin wrappers over the loosely-typed JSON
//! those endpoints return.

use crate::error::FetchError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

/// Upstream feed of college-football scoreboards and per-event summaries
///
/// `EspnClient` is the production implementation; tests plug in canned
/// payloads.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Every event listed for `date`
    async fn fetch_scoreboard(&self, date: NaiveDate) -> Result<ScoreboardFeed, FetchError>;

    /// Detailed summary (boxscore included) for one event
    async fn fetch_summary(&self, event_id: &str) -> Result<EventSummary, FetchError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}

/// Scoreboard response. Field presence is not guaranteed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreboardFeed {
    raw: Value,
}

impl ScoreboardFeed {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// `events[]`, or nothing when the key is missing or not an array
    pub fn events(&self) -> &[Value] {
        self.raw["events"].as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Event summary response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSummary {
    raw: Value,
}

impl EventSummary {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// `boxscore.teams[]`, each `{ team: {...}, statistics: [...] }`
    pub fn boxscore_teams(&self) -> &[Value] {
        self.raw["boxscore"]["teams"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Competitors of an event's first competition
pub fn event_competitors(event: &Value) -> &[Value] {
    event["competitions"][0]["competitors"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
