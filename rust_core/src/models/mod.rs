// Shared models for the leaderboard core and service
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration input
// ============================================================================

/// A configured (participant, team) pair to track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    #[serde(alias = "participant")]
    pub participant_name: String,
    #[serde(alias = "team")]
    pub configured_team_name: String,
}

impl Matchup {
    pub fn new(participant_name: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self {
            participant_name: participant_name.into(),
            configured_team_name: team_name.into(),
        }
    }
}

// ============================================================================
// Game state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Scheduled,
    InProgress,
    Completed,
    Unknown,
}

impl GameState {
    /// Map ESPN's `status.type.state` ("pre", "in", "post")
    pub fn from_espn_state(state: &str) -> Self {
        match state.trim().to_lowercase().as_str() {
            "pre" => GameState::Scheduled,
            "in" => GameState::InProgress,
            "post" => GameState::Completed,
            _ => GameState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Scheduled => "scheduled",
            GameState::InProgress => "in_progress",
            GameState::Completed => "completed",
            GameState::Unknown => "unknown",
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, GameState::Scheduled)
    }
}

// ============================================================================
// Per-cycle results
// ============================================================================

/// How a matchup's resolution ended this cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Event found and read (stat fields may still be absent)
    Resolved,
    /// No event in the feed matched the configured team
    NotFound,
    /// Fetching or reading this matchup's event failed
    Failed(String),
}

impl ResolutionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ResolutionOutcome::Failed(_))
    }
}

/// One leaderboard row for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupResult {
    pub participant_name: String,
    pub configured_team_name: String,
    pub event_id: Option<String>,
    pub passing_yards: Option<i64>,
    pub team_score: Option<i64>,
    pub opponent_score: Option<i64>,
    /// Tracked team's score minus the opponent's
    pub lead_margin: Option<i64>,
    pub game_state: GameState,
    pub status_text: String,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub outcome: ResolutionOutcome,
}

impl MatchupResult {
    /// Row for a team with no event in today's feed
    pub fn not_found(matchup: &Matchup) -> Self {
        Self::empty(matchup, "No game found".to_string(), ResolutionOutcome::NotFound)
    }

    /// Row for a matchup whose event could not be fetched or read
    pub fn failed(matchup: &Matchup, event_id: Option<String>, reason: String) -> Self {
        let mut result = Self::empty(
            matchup,
            format!("Error: {}", reason),
            ResolutionOutcome::Failed(reason),
        );
        result.event_id = event_id;
        result
    }

    fn empty(matchup: &Matchup, status_text: String, outcome: ResolutionOutcome) -> Self {
        Self {
            participant_name: matchup.participant_name.clone(),
            configured_team_name: matchup.configured_team_name.clone(),
            event_id: None,
            passing_yards: None,
            team_score: None,
            opponent_score: None,
            lead_margin: None,
            game_state: GameState::Unknown,
            status_text,
            scheduled_start: None,
            outcome,
        }
    }
}

// ============================================================================
// Published snapshot
// ============================================================================

/// Ranked result set for one refresh, plus cycle-level error state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub results: Vec<MatchupResult>,
    /// When the results were produced; `None` until the first successful cycle
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Set when the latest cycle failed; `results` then still hold the last good cycle
    pub error: Option<String>,
}

impl LeaderboardSnapshot {
    pub fn new(results: Vec<MatchupResult>) -> Self {
        Self {
            results,
            refreshed_at: Some(Utc::now()),
            error: None,
        }
    }

    /// Keep the last good results and flag the failed cycle
    pub fn with_error(&self, error: String) -> Self {
        Self {
            results: self.results.clone(),
            refreshed_at: self.refreshed_at,
            error: Some(error),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
